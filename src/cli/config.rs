//! Config command implementation
//!
//! Utilities for inspecting, validating and editing the settings file.

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use crate::core::OutputFormat;
use crate::settings::{Settings, SettingsError};

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the settings file
    Validate,
    /// Dump configuration to stdout (cookie masked)
    Dump {
        /// Output format: json or toml
        #[arg(short = 'o', long = "output", default_value = "json")]
        output: String,
    },
    /// Show the settings file path
    Path,
    /// Write values to the settings file
    Set(SetArgs),
}

/// Values to persist; unset flags leave the stored value alone
#[derive(Args, Debug, Default)]
pub struct SetArgs {
    /// claude.ai organization id
    #[arg(long = "organization-id")]
    pub organization_id: Option<String>,

    /// Cookie header value containing the session key
    #[arg(long = "session-cookie")]
    pub session_cookie: Option<String>,

    /// Poll interval in seconds
    #[arg(long = "poll-interval")]
    pub poll_interval: Option<u64>,

    /// Widget label
    #[arg(long = "widget-label")]
    pub widget_label: Option<String>,

    /// Output format: text or waybar
    #[arg(long = "output-format")]
    pub output_format: Option<OutputFormat>,
}

/// Run the config command against the settings file at `path`
pub async fn run(args: ConfigArgs, path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.ok_or(SettingsError::PathNotAvailable)?;
    match args.command {
        ConfigCommand::Validate => validate_config(&path),
        ConfigCommand::Dump { output } => dump_config(&path, &output),
        ConfigCommand::Path => show_path(&path),
        ConfigCommand::Set(set) => set_config(&path, &set),
    }
}

/// Outcome of checking a settings file
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check that the settings file parses and holds usable credentials
pub fn validate_file(path: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    match Settings::load_from(path) {
        Ok(Some(settings)) => {
            if settings.organization_id.trim().is_empty() {
                report.warnings.push("organization_id is empty".to_string());
            }
            if settings.cookie.trim().is_empty() {
                report.warnings.push("cookie is empty".to_string());
            } else if !settings.cookie.contains("sessionKey=") {
                report
                    .warnings
                    .push("cookie has no sessionKey= entry; requests will likely be rejected".to_string());
            }
            if settings.poll_interval_secs == 0 {
                report
                    .warnings
                    .push("poll_interval_secs is 0; 1 second will be used".to_string());
            }
        }
        Ok(None) => {
            report
                .warnings
                .push("File does not exist, using defaults".to_string());
        }
        Err(e) => report.errors.push(e.to_string()),
    }

    report
}

fn validate_config(path: &Path) -> anyhow::Result<()> {
    println!("Checking {}...", path.display());
    let report = validate_file(path);

    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("Configuration is valid.");
        return Ok(());
    }

    if !report.warnings.is_empty() {
        println!("Warnings:");
        for w in &report.warnings {
            println!("  - {}", w);
        }
    }
    if !report.errors.is_empty() {
        println!("Errors:");
        for e in &report.errors {
            println!("  - {}", e);
        }
        anyhow::bail!(
            "Configuration validation failed with {} error(s).",
            report.errors.len()
        );
    }

    Ok(())
}

/// Render settings for display; the cookie is always masked
pub fn render_dump(settings: &Settings, format: &str) -> anyhow::Result<String> {
    let masked = settings.masked();
    match format.to_lowercase().as_str() {
        "json" => Ok(serde_json::to_string_pretty(&masked)?),
        "toml" => Ok(toml::to_string_pretty(&masked)?),
        _ => anyhow::bail!("Unknown format '{}'. Supported formats: json, toml", format),
    }
}

fn dump_config(path: &Path, format: &str) -> anyhow::Result<()> {
    let settings = Settings::load_from(path)?.unwrap_or_default();
    println!("{}", render_dump(&settings, format)?);
    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    let exists = if path.exists() { "" } else { " (not found)" };
    println!("Settings: {}{}", path.display(), exists);
    Ok(())
}

/// Merge `set` into `settings`
pub fn apply_set(settings: &mut Settings, set: &SetArgs) {
    if let Some(ref org) = set.organization_id {
        settings.organization_id = org.trim().to_string();
    }
    if let Some(ref cookie) = set.session_cookie {
        settings.cookie = cookie.trim().to_string();
    }
    if let Some(interval) = set.poll_interval {
        settings.poll_interval_secs = interval;
    }
    if let Some(ref label) = set.widget_label {
        settings.label = label.clone();
    }
    if let Some(format) = set.output_format {
        settings.output_format = format;
    }
}

fn set_config(path: &Path, set: &SetArgs) -> anyhow::Result<()> {
    let mut settings = Settings::load_from(path)?.unwrap_or_default();
    apply_set(&mut settings, set);
    settings.save_to(path)?;
    tracing::info!(path = %path.display(), "Settings saved");
    println!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_missing_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let report = validate_file(&dir.path().join("settings.json"));
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_validate_invalid_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"poll_interval_secs": "soon"}"#).unwrap();

        let report = validate_file(&path);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_validate_complete_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            organization_id: "org".to_string(),
            cookie: "sessionKey=sk-ant-1".to_string(),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();

        let report = validate_file(&path);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_validate_cookie_without_session_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            organization_id: "org".to_string(),
            cookie: "lastActiveOrg=org".to_string(),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();

        let report = validate_file(&path);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("sessionKey"));
    }

    #[test]
    fn test_render_dump_masks_cookie() {
        let settings = Settings {
            organization_id: "org-1".to_string(),
            cookie: "sessionKey=sk-ant-secretvalue".to_string(),
            ..Default::default()
        };

        let json = render_dump(&settings, "json").unwrap();
        assert!(json.contains("org-1"));
        assert!(!json.contains("secretvalue"));

        let toml = render_dump(&settings, "TOML").unwrap();
        assert!(toml.contains("organization_id = \"org-1\""));
        assert!(toml.contains("output_format = \"text\""));

        assert!(render_dump(&settings, "yaml").is_err());
    }

    #[test]
    fn test_set_persists_and_merges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        set_config(
            &path,
            &SetArgs {
                organization_id: Some(" org-9 ".to_string()),
                poll_interval: Some(300),
                ..Default::default()
            },
        )
        .unwrap();
        set_config(
            &path,
            &SetArgs {
                session_cookie: Some("sessionKey=abc".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap().unwrap();
        assert_eq!(settings.organization_id, "org-9");
        assert_eq!(settings.cookie, "sessionKey=abc");
        assert_eq!(settings.poll_interval_secs, 300);
        assert!(settings.is_configured());
    }
}
