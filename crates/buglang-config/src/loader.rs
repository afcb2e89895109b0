//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::settings::{validate_log_level, DiagnosticReport, HoverSpan, LogConfig, Settings};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the project settings file
pub const PROJECT_CONFIG_FILE: &str = "buglang.toml";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.buglang/config.toml) - lowest priority
/// 2. Project config (./buglang.toml) - overrides global
/// 3. Environment variables (BUGLANG_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Effective settings after merging every source
    pub settings: Settings,

    /// Directory where buglang.toml was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use an explicit global config path instead of ~/.buglang/config.toml
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find buglang.toml, then merges it over
    /// the global config if one exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_settings) = self.find_project_config(start_dir)?;

        let mut settings = self.load_global_config()?;
        settings.merge(&project_settings);

        let settings = self.apply_env_overrides(settings)?;

        Ok(Config {
            settings,
            project_root,
        })
    }

    /// Load configuration from a specific settings file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let file_settings = Settings::load_from_file(config_path)?;

        let mut settings = self.load_global_config()?;
        settings.merge(&file_settings);

        let settings = self.apply_env_overrides(settings)?;
        let project_root = config_path.parent().map(|p| p.to_path_buf());

        Ok(Config {
            settings,
            project_root,
        })
    }

    /// Find project configuration by walking up directory tree
    fn find_project_config(&self, start_dir: &Path) -> ConfigResult<(Option<PathBuf>, Settings)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                let settings = Settings::load_from_file(&config_path)?;
                return Ok((Some(current), settings));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, Settings::default())),
            }
        }
    }

    /// Load global configuration from ~/.buglang/config.toml
    fn load_global_config(&mut self) -> ConfigResult<Settings> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => match Self::global_config_dir() {
                Ok(dir) => {
                    let path = dir.join("config.toml");
                    self.global_config_path = Some(path.clone());
                    path
                }
                // No home directory means no global config
                Err(ConfigError::HomeNotFound) => return Ok(Settings::default()),
                Err(e) => return Err(e),
            },
        };

        // Global config is optional
        if !path.exists() {
            return Ok(Settings::default());
        }

        Settings::load_from_file(&path)
    }

    /// Apply environment variable overrides
    ///
    /// - BUGLANG_LOG: log level
    /// - BUGLANG_DIAGNOSTICS_REPORT: "first" or "all"
    /// - BUGLANG_HOVER_SPAN: "first-occurrence" or "cursor"
    fn apply_env_overrides(&self, mut settings: Settings) -> ConfigResult<Settings> {
        if let Ok(level) = env::var("BUGLANG_LOG") {
            let level = level.trim().to_lowercase();
            validate_log_level(&level)?;
            settings.log = Some(LogConfig { level: Some(level) });
        }

        if let Ok(report) = env::var("BUGLANG_DIAGNOSTICS_REPORT") {
            let report: DiagnosticReport = report.parse()?;
            settings
                .diagnostics
                .get_or_insert_with(Default::default)
                .report = Some(report);
        }

        if let Ok(span) = env::var("BUGLANG_HOVER_SPAN") {
            let span: HoverSpan = span.parse()?;
            settings.hover.get_or_insert_with(Default::default).span = Some(span);
        }

        Ok(settings)
    }

    /// Get the global configuration directory (~/.buglang)
    pub fn global_config_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".buglang"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a buglang.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}
