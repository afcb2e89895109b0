//! Buglang Language Server Protocol (LSP) library
//!
//! Provides the LSP server implementation for Buglang: misspelling
//! diagnostics, keyword/builtin completion and hover descriptions.

pub mod completion;
pub mod convert;
pub mod diagnostics;
pub mod document;
pub mod hover;
pub mod server;
pub mod symbols;
pub mod transport;
