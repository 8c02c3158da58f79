//! CLI module - command-line interface
//!
//! - `claude-usage-bar` - defaults to the watch command
//! - `claude-usage-bar once` - fetch and print a single update
//! - `claude-usage-bar open` - open the usage page in the browser
//! - `claude-usage-bar config` - inspect or edit settings

pub mod config;
pub mod once;
pub mod open;
pub mod watch;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::{OutputFormat, WidgetStyle};
use crate::settings::{Settings, SettingsOverrides};

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const UNEXPECTED_FAILURE: i32 = 1;
    pub const NOT_CONFIGURED: i32 = 2;
    pub const PARSE_ERROR: i32 = 3;
}

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT"),
    " ",
    env!("BUILD_DATE"),
    ")"
);

/// claude-usage-bar - Claude usage limits for your status bar
///
/// Polls the claude.ai usage endpoint and prints one line per update.
/// Defaults to the watch command when no subcommand is given.
#[derive(Parser, Debug)]
#[command(name = "claude-usage-bar")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Cli {
    // === Global flags ===

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit machine-readable logs (JSON) to stderr
    #[arg(long = "json-output", global = true)]
    pub json_output: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", global = true, value_parser = ["trace", "verbose", "debug", "info", "warning", "warn", "error", "critical"])]
    pub log_level: Option<String>,

    /// Disable ANSI colors in output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, env = "CLAUDE_USAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// claude.ai organization id
    #[arg(long = "org-id", global = true, env = "CLAUDE_USAGE_ORG_ID")]
    pub org_id: Option<String>,

    /// Cookie header value containing the session key
    #[arg(long, global = true, env = "CLAUDE_USAGE_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Poll interval in seconds
    #[arg(short, long, global = true, env = "CLAUDE_USAGE_INTERVAL")]
    pub interval: Option<u64>,

    /// Output format: text or waybar
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Label shown before the readings
    #[arg(long, global = true)]
    pub label: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll forever and print one line per update (default command)
    Watch,

    /// Fetch usage once, print a single line and exit
    Once,

    /// Open the Claude usage page in the default browser
    Open(open::OpenArgs),

    /// Inspect or edit configuration
    Config(config::ConfigArgs),
}

impl Cli {
    /// Settings path in effect: `--config` or the platform default
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Settings::settings_path)
    }

    /// Overrides collected from flags and environment
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            organization_id: self.org_id.clone(),
            cookie: self.cookie.clone(),
            poll_interval_secs: self.interval,
            label: self.label.clone(),
            output_format: self.format,
        }
    }

    /// Whether to color text output
    pub fn use_color(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none() && is_terminal()
    }
}

/// Load settings from `path` (defaults when absent or unknown) and apply overrides
pub fn resolve_settings(path: Option<&std::path::Path>, overrides: &SettingsOverrides) -> Settings {
    let mut settings = match path {
        Some(path) => match Settings::load_from(path) {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Settings::default()
            }
        },
        None => Settings::default(),
    };
    settings.apply(overrides);
    settings
}

/// Widget style for the given settings
pub fn widget_style(settings: &Settings, path: Option<&std::path::Path>) -> WidgetStyle {
    WidgetStyle {
        label: settings.label.clone(),
        settings_hint: path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "settings.json".to_string()),
    }
}

/// Check if stdout is a terminal
fn is_terminal() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_watch() {
        let cli = Cli::try_parse_from(["claude-usage-bar"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_global_overrides() {
        let cli = Cli::try_parse_from([
            "claude-usage-bar",
            "once",
            "--org-id",
            "org-1",
            "--cookie",
            "sessionKey=x",
            "--interval",
            "30",
            "--format",
            "waybar",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Once)));

        let overrides = cli.overrides();
        assert_eq!(overrides.organization_id.as_deref(), Some("org-1"));
        assert_eq!(overrides.cookie.as_deref(), Some("sessionKey=x"));
        assert_eq!(overrides.poll_interval_secs, Some(30));
        assert_eq!(overrides.output_format, Some(OutputFormat::Waybar));
    }

    #[test]
    fn test_parse_rejects_bad_format() {
        assert!(Cli::try_parse_from(["claude-usage-bar", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_resolve_settings_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let overrides = SettingsOverrides {
            cookie: Some("c".to_string()),
            ..Default::default()
        };
        let settings = resolve_settings(Some(&path), &overrides);
        assert_eq!(settings.cookie, "c");
        assert_eq!(settings.poll_interval_secs, 60);
    }

    #[test]
    fn test_resolve_settings_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"organization_id": "file-org", "cookie": "file-cookie", "poll_interval_secs": 90}"#,
        )
        .unwrap();

        let overrides = SettingsOverrides {
            organization_id: Some("cli-org".to_string()),
            ..Default::default()
        };
        let settings = resolve_settings(Some(&path), &overrides);
        assert_eq!(settings.organization_id, "cli-org");
        assert_eq!(settings.cookie, "file-cookie");
        assert_eq!(settings.poll_interval_secs, 90);
    }

    #[test]
    fn test_widget_style_hint() {
        let settings = Settings::default();
        let style = widget_style(&settings, Some(std::path::Path::new("/etc/cub.json")));
        assert_eq!(style.label, "Claude");
        assert_eq!(style.settings_hint, "/etc/cub.json");
    }
}
