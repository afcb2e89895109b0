//! Buglang Language Server Protocol (LSP) server
//!
//! Provides diagnostics, completion and hover for Buglang source files in
//! editors like VSCode, Neovim, and Zed.

use std::path::{Path, PathBuf};

use anyhow::Result;
use buglang_config::settings::DEFAULT_LOG_LEVEL;
use buglang_config::{Config, ConfigLoader, ConfigResult, Settings};
use buglang_lsp::transport::{self, Transport, DEFAULT_HOST, DEFAULT_PORT};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Buglang language server.
///
/// Speaks the Language Server Protocol over stdio by default.
///
/// EXAMPLES:
///     buglang-lsp                     Serve over stdio
///     buglang-lsp --tcp --port 9257   Serve over TCP
///
/// ENVIRONMENT VARIABLES:
///     BUGLANG_CONFIG               Settings file to load
///     BUGLANG_LOG                  Log level (trace, debug, info, warn, error)
///     BUGLANG_DIAGNOSTICS_REPORT   "first" or "all"
///     BUGLANG_HOVER_SPAN           "first-occurrence" or "cursor"
///     RUST_LOG                     Full tracing filter, overrides BUGLANG_LOG
#[derive(Parser, Debug)]
#[command(name = "buglang-lsp")]
#[command(version)]
struct Cli {
    /// Use TCP mode instead of stdio
    #[arg(long)]
    tcp: bool,
    /// Port for TCP mode
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Bind address for TCP mode
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,
    /// Settings file; skips the buglang.toml search
    #[arg(long, env = "BUGLANG_CONFIG")]
    config: Option<PathBuf>,
    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn transport(&self) -> Transport {
        if self.tcp {
            Transport::Tcp {
                host: self.host.clone(),
                port: self.port,
            }
        } else {
            Transport::Stdio
        }
    }
}

fn load_config(explicit: Option<&Path>) -> ConfigResult<Config> {
    let mut loader = ConfigLoader::new();
    match explicit {
        Some(path) => loader.load_from_file(path),
        None => {
            let cwd = std::env::current_dir()?;
            loader.load_from_directory(&cwd)
        }
    }
}

/// Log to stderr; stdout carries the protocol in stdio mode
fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref());
    let level = match &loaded {
        Ok(config) => config.settings.log_level(),
        Err(_) => DEFAULT_LOG_LEVEL,
    };
    init_logging(cli.verbose, level);

    let settings = match loaded {
        Ok(config) => {
            if let Some(root) = config.project_root() {
                info!(root = %root.display(), "loaded project settings");
            }
            config.settings
        }
        Err(e) => {
            warn!(error = %e, "failed to load configuration, using defaults");
            Settings::default()
        }
    };

    transport::serve(cli.transport(), settings).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_stdio() {
        let cli = Cli::try_parse_from(["buglang-lsp"]).unwrap();
        assert_eq!(cli.transport(), Transport::Stdio);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_tcp_mode() {
        let cli =
            Cli::try_parse_from(["buglang-lsp", "--tcp", "--port", "8080", "--host", "0.0.0.0"])
                .unwrap();
        assert_eq!(
            cli.transport(),
            Transport::Tcp {
                host: "0.0.0.0".to_string(),
                port: 8080,
            }
        );
    }

    #[test]
    fn test_tcp_defaults() {
        let cli = Cli::try_parse_from(["buglang-lsp", "--tcp"]).unwrap();
        assert_eq!(
            cli.transport(),
            Transport::Tcp {
                host: "127.0.0.1".to_string(),
                port: 9257,
            }
        );
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }
}
