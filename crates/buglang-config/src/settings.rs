//! Language server settings (buglang.toml / ~/.buglang/config.toml)
//!
//! Every section and field is optional; the accessors on [`Settings`] fill in
//! the defaults the server runs with.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Source tag attached to published diagnostics
pub const DEFAULT_SOURCE: &str = "Buglang LSP";

/// Language id used for hover code fragments
pub const DEFAULT_LANGUAGE_ID: &str = "buglang";

/// Log level used when neither the settings nor the environment pick one
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Settings file contents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Server identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Diagnostic scanning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<DiagnosticsConfig>,

    /// Code completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionConfig>,

    /// Hover information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<HoverConfig>,

    /// Logging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
}

/// Server identity settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Source tag shown next to diagnostics (default: "Buglang LSP")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Language id for hover code fragments (default: "buglang")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
}

/// Diagnostic settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Publish diagnostics at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// How many matches per line are reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<DiagnosticReport>,
}

/// Completion settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct CompletionConfig {
    /// Advertise and answer completion requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Hover settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct HoverConfig {
    /// Advertise and answer hover requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// How the word under the cursor is located
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<HoverSpan>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// One of trace, debug, info, warn, error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Per-line reporting policy of the misspelling scan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticReport {
    /// Only the first match on a line
    #[default]
    First,
    /// Every match on a line, left to right
    All,
}

/// How a hover word's span is computed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HoverSpan {
    /// Span of the first textual occurrence of the word in the line
    #[default]
    FirstOccurrence,
    /// Span of the occurrence actually matched
    Cursor,
}

impl FromStr for DiagnosticReport {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "all" => Ok(Self::All),
            other => Err(ConfigError::InvalidValue {
                field: "diagnostics.report".to_string(),
                reason: format!("must be 'first' or 'all', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::All => f.write_str("all"),
        }
    }
}

impl FromStr for HoverSpan {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "first-occurrence" => Ok(Self::FirstOccurrence),
            "cursor" => Ok(Self::Cursor),
            other => Err(ConfigError::InvalidValue {
                field: "hover.span".to_string(),
                reason: format!("must be 'first-occurrence' or 'cursor', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for HoverSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstOccurrence => f.write_str("first-occurrence"),
            Self::Cursor => f.write_str("cursor"),
        }
    }
}

impl Settings {
    /// Load settings from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(server) = &self.server {
            if let Some(source) = &server.source {
                if source.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "server.source".to_string(),
                        reason: "must not be empty".to_string(),
                    });
                }
            }
            if let Some(language_id) = &server.language_id {
                validate_language_id(language_id)?;
            }
        }

        if let Some(level) = self.log.as_ref().and_then(|l| l.level.as_deref()) {
            validate_log_level(level)?;
        }

        Ok(())
    }

    /// Merge another settings value into this one
    /// Other settings take precedence for non-None sections
    pub fn merge(&mut self, other: &Settings) {
        if other.server.is_some() {
            self.server = other.server.clone();
        }
        if other.diagnostics.is_some() {
            self.diagnostics = other.diagnostics.clone();
        }
        if other.completion.is_some() {
            self.completion = other.completion.clone();
        }
        if other.hover.is_some() {
            self.hover = other.hover.clone();
        }
        if other.log.is_some() {
            self.log = other.log.clone();
        }
    }

    pub fn source(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.source.as_deref())
            .unwrap_or(DEFAULT_SOURCE)
    }

    pub fn language_id(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.language_id.as_deref())
            .unwrap_or(DEFAULT_LANGUAGE_ID)
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
            .as_ref()
            .and_then(|d| d.enabled)
            .unwrap_or(true)
    }

    pub fn diagnostic_report(&self) -> DiagnosticReport {
        self.diagnostics
            .as_ref()
            .and_then(|d| d.report)
            .unwrap_or_default()
    }

    pub fn completion_enabled(&self) -> bool {
        self.completion
            .as_ref()
            .and_then(|c| c.enabled)
            .unwrap_or(true)
    }

    pub fn hover_enabled(&self) -> bool {
        self.hover.as_ref().and_then(|h| h.enabled).unwrap_or(true)
    }

    pub fn hover_span(&self) -> HoverSpan {
        self.hover.as_ref().and_then(|h| h.span).unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.log
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Validate a log level name
pub(crate) fn validate_log_level(level: &str) -> ConfigResult<()> {
    if !LOG_LEVELS.contains(&level) {
        return Err(ConfigError::InvalidValue {
            field: "log.level".to_string(),
            reason: format!(
                "must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                level
            ),
        });
    }
    Ok(())
}

fn validate_language_id(language_id: &str) -> ConfigResult<()> {
    let valid = !language_id.is_empty()
        && language_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ConfigError::InvalidValue {
            field: "server.language_id".to_string(),
            reason: format!("'{}' is not a valid language id", language_id),
        });
    }
    Ok(())
}
