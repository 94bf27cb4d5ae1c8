//! Server configuration
//!
//! Sources, lowest priority first: built-in defaults, a TOML file
//! (`--config`, else `$OFFICE_MCP_CONFIG`), `OFFICE_MCP_*` environment
//! variables, then command-line flags (applied by the binary).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "OFFICE_MCP_CONFIG";
pub const LOG_LEVEL_VAR: &str = "OFFICE_MCP_LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "OFFICE_MCP_LOG_FORMAT";
pub const ENABLE_AUTOMATION_VAR: &str = "OFFICE_MCP_ENABLE_AUTOMATION";
pub const AUTOMATION_TIMEOUT_VAR: &str = "OFFICE_MCP_AUTOMATION_TIMEOUT_SECS";
pub const TEMPLATES_DIR_VAR: &str = "OFFICE_MCP_TEMPLATES_DIR";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Errors raised while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err("expected pretty or json".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Prefer live Office applications when they are running
    pub enabled: bool,
    /// Per-script limit before the interpreter is killed
    pub timeout_secs: u64,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(target_os = "macos"),
            timeout_secs: 30,
        }
    }
}

impl AutomationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Effective server configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub logging: LoggingConfig,
    pub automation: AutomationConfig,
    /// Directory scanned by `list_templates`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load from the file and the process environment
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::load_with(path, &vars)
    }

    /// Load against an explicit set of environment variables
    pub fn load_with(path: Option<&Path>, vars: &HashMap<String, String>) -> ConfigResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| vars.get(CONFIG_PATH_VAR).map(PathBuf::from));
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(vars)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env(&mut self, vars: &HashMap<String, String>) -> ConfigResult<()> {
        if let Some(level) = vars.get(LOG_LEVEL_VAR) {
            self.logging.level = level.trim().to_ascii_lowercase();
        }
        if let Some(format) = vars.get(LOG_FORMAT_VAR) {
            self.logging.format = format
                .parse()
                .map_err(|reason| invalid(LOG_FORMAT_VAR, format, reason))?;
        }
        if let Some(enabled) = vars.get(ENABLE_AUTOMATION_VAR) {
            self.automation.enabled = parse_bool(enabled)
                .ok_or_else(|| invalid(ENABLE_AUTOMATION_VAR, enabled, "expected true or false"))?;
        }
        if let Some(secs) = vars.get(AUTOMATION_TIMEOUT_VAR) {
            self.automation.timeout_secs = secs.trim().parse().map_err(|_| {
                invalid(AUTOMATION_TIMEOUT_VAR, secs, "expected a whole number of seconds")
            })?;
        }
        if let Some(dir) = vars.get(TEMPLATES_DIR_VAR) {
            self.templates_dir = Some(PathBuf::from(dir)).filter(|d| !d.as_os_str().is_empty());
        }
        Ok(())
    }

    /// Reject values that would only fail later, at runtime
    pub fn validate(&self) -> ConfigResult<()> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid(
                "logging.level",
                &self.logging.level,
                "expected trace, debug, info, warn or error",
            ));
        }
        if self.automation.timeout_secs == 0 {
            return Err(invalid(
                "automation.timeout_secs",
                "0",
                "must be at least 1 second",
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, log_level: Option<&str>, no_automation: bool) -> ConfigResult<Self> {
        if let Some(level) = log_level {
            self.logging.level = level.trim().to_ascii_lowercase();
        }
        if no_automation {
            self.automation.enabled = false;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

fn invalid(key: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
