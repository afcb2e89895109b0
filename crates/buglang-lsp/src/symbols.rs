//! Static symbol tables for Buglang
//!
//! Keywords, builtins and their one-line descriptions. The tables are built
//! once at start-up and shared read-only by every handler.

use std::collections::HashMap;

/// Reserved words, in completion order
pub const KEYWORDS: &[&str] = &[
    "class", "func", "return", "for", "new", "super", "this", "import", "if", "else", "while",
];

/// Builtin identifiers, in completion order
pub const BUILTINS: &[&str] = &[
    "println",
    "input",
    "print",
    "console",
    "consoleln",
    "math",
    "ffi",
    "ffi.load",
    "ffi.call",
];

/// Descriptions shown in completion documentation and hovers.
///
/// Some entries (`math.round`, `size`, `add`) name members that are neither
/// keywords nor builtins; they are only reachable through a direct lookup.
pub const DESCRIPTIONS: &[(&str, &str)] = &[
    ("class", "Defines a class in Buglang."),
    ("func", "Defines a function in Buglang."),
    ("return", "Returns a value from a function."),
    ("for", "Iterates over a collection or range."),
    ("new", "Creates a new instance of a class."),
    ("super", "Calls a parent class method or constructor."),
    ("this", "Refers to the current instance."),
    ("import", "Imports a module or library."),
    ("if", "Conditional statement."),
    ("else", "Alternative branch for if statement."),
    ("while", "Loops while a condition is true."),
    ("println", "Prints a line to the console."),
    ("math.round", "Rounds a number to the specified decimal places."),
    ("size", "Returns the size of an array or collection."),
    ("add", "Adds an element to an array."),
];

/// What a word is, as far as the tables know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Keyword,
    Builtin,
    Identifier,
}

/// Keyword set, builtin set and description table
#[derive(Debug, Clone)]
pub struct SymbolTables {
    keywords: Vec<String>,
    builtins: Vec<String>,
    descriptions: HashMap<String, String>,
}

impl SymbolTables {
    /// Build tables from arbitrary contents
    pub fn new(keywords: &[&str], builtins: &[&str], descriptions: &[(&str, &str)]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            builtins: builtins.iter().map(|b| b.to_string()).collect(),
            descriptions: descriptions
                .iter()
                .map(|(name, doc)| (name.to_string(), doc.to_string()))
                .collect(),
        }
    }

    /// The Buglang tables
    pub fn buglang() -> Self {
        Self::new(KEYWORDS, BUILTINS, DESCRIPTIONS)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn builtins(&self) -> impl Iterator<Item = &str> {
        self.builtins.iter().map(String::as_str)
    }

    /// Exact-key description lookup; no case folding or trimming
    pub fn description(&self, name: &str) -> Option<&str> {
        self.descriptions.get(name).map(String::as_str)
    }

    /// Keywords win over builtins; anything else is an identifier
    pub fn classify(&self, word: &str) -> Classification {
        if self.keywords.iter().any(|k| k == word) {
            Classification::Keyword
        } else if self.builtins.iter().any(|b| b == word) {
            Classification::Builtin
        } else {
            Classification::Identifier
        }
    }

    /// Number of completion candidates the tables produce
    pub fn candidate_count(&self) -> usize {
        self.keywords.len() + self.builtins.len()
    }
}

impl Default for SymbolTables {
    fn default() -> Self {
        Self::buglang()
    }
}
