//! Settings management for claude-usage-bar
//!
//! Handles persistent configuration including:
//! - Organization id and session cookie
//! - Poll interval
//! - Widget label and output format

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use thiserror::Error;

use crate::core::OutputFormat;

/// Default poll interval in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Intervals below this are clamped so the endpoint is never hammered
pub const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// Errors reading or writing the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not determine settings path")]
    PathNotAvailable,

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// claude.ai organization UUID
    pub organization_id: String,

    /// Poll interval in seconds
    pub poll_interval_secs: u64,

    /// Raw Cookie header sent with every request (contains the session key)
    pub cookie: String,

    /// Prefix shown in the widget text
    pub label: String,

    /// Output format for widget updates
    pub output_format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organization_id: String::new(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            cookie: String::new(),
            label: "Claude".to_string(),
            output_format: OutputFormat::Text,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("claude-usage-bar").join("settings.json"))
    }

    /// Load settings from `path`; `Ok(None)` when the file does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>, SettingsError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&content).map_err(|source| SettingsError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(settings))
    }

    /// Save settings to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)?;

        Ok(())
    }

    /// Both organization id and cookie are present
    pub fn is_configured(&self) -> bool {
        !self.organization_id.trim().is_empty() && !self.cookie.trim().is_empty()
    }

    /// Poll interval as a duration, clamped to the minimum
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(MIN_POLL_INTERVAL_SECS))
    }

    /// Apply command-line / environment overrides on top of file settings
    pub fn apply(&mut self, overrides: &SettingsOverrides) {
        if let Some(ref org) = overrides.organization_id {
            self.organization_id = org.clone();
        }
        if let Some(ref cookie) = overrides.cookie {
            self.cookie = cookie.clone();
        }
        if let Some(interval) = overrides.poll_interval_secs {
            self.poll_interval_secs = interval;
        }
        if let Some(ref label) = overrides.label {
            self.label = label.clone();
        }
        if let Some(format) = overrides.output_format {
            self.output_format = format;
        }
    }

    /// Copy safe to print: the cookie value is masked
    pub fn masked(&self) -> Self {
        Self {
            cookie: mask_secret(&self.cookie),
            ..self.clone()
        }
    }
}

/// Values that take precedence over the settings file
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub organization_id: Option<String>,
    pub cookie: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub label: Option<String>,
    pub output_format: Option<OutputFormat>,
}

/// Mask a secret for display (show first 4 and last 4 chars)
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.is_empty() {
        String::new()
    } else if chars.len() > 12 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else if chars.len() > 4 {
        let head: String = chars[..4].iter().collect();
        format!("{}...", head)
    } else {
        "****".to_string()
    }
}

/// Modification time of the settings file, if it exists
pub fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
