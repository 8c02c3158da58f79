//! Status widget
//!
//! Turns the outcome of a poll into the text, tooltip and class a status bar
//! shows, and serializes that for the configured output format.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{format_reset_iso, FetchError, Severity, UsageBucket, UsageResponse};

/// What the widget is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState {
    /// First poll has not completed yet
    Loading,
    /// Organization id or cookie missing
    Unconfigured,
    /// The last poll failed; holds the message shown in the tooltip
    Offline(String),
    /// The last poll succeeded
    Ok(UsageResponse),
}

impl WidgetState {
    /// State for the result of one poll
    pub fn from_result(result: Result<UsageResponse, FetchError>) -> Self {
        match result {
            Ok(resp) => WidgetState::Ok(resp),
            Err(FetchError::NotConfigured) => WidgetState::Unconfigured,
            Err(e) => WidgetState::Offline(e.to_string()),
        }
    }

    /// Render against `now`, which only affects reset countdowns
    pub fn render(&self, style: &WidgetStyle, now: DateTime<Utc>) -> WidgetOutput {
        let label = &style.label;
        match self {
            WidgetState::Loading => WidgetOutput {
                text: format!("{}: loading", label),
                tooltip: "Fetching usage...".to_string(),
                class: "loading".to_string(),
                percentage: None,
                severity: None,
            },
            WidgetState::Unconfigured => WidgetOutput {
                text: format!("{}: configure settings", label),
                tooltip: format!(
                    "Set organization_id and cookie in {} (or CLAUDE_USAGE_ORG_ID / CLAUDE_USAGE_COOKIE)",
                    style.settings_hint
                ),
                class: "unconfigured".to_string(),
                percentage: None,
                severity: None,
            },
            WidgetState::Offline(msg) => WidgetOutput {
                text: format!("{}: offline", label),
                tooltip: msg.clone(),
                class: "offline".to_string(),
                percentage: None,
                severity: None,
            },
            WidgetState::Ok(resp) => {
                let severity = resp.severity();
                WidgetOutput {
                    text: format!(
                        "{}: 5h {}% | 7d {}%",
                        label,
                        percent_or_unknown(resp.five_hour.as_ref()),
                        percent_or_unknown(resp.seven_day.as_ref())
                    ),
                    tooltip: render_tooltip(resp, now),
                    class: severity.class_name().to_string(),
                    percentage: resp.five_hour.as_ref().map(UsageBucket::rounded_percent),
                    severity: Some(severity),
                }
            }
        }
    }
}

/// Presentation knobs that do not depend on the poll result
#[derive(Debug, Clone)]
pub struct WidgetStyle {
    /// Prefix shown before the readings
    pub label: String,
    /// Where the user should put credentials, shown when unconfigured
    pub settings_hint: String,
}

impl Default for WidgetStyle {
    fn default() -> Self {
        Self {
            label: "Claude".to_string(),
            settings_hint: "settings.json".to_string(),
        }
    }
}

fn percent_or_unknown(bucket: Option<&UsageBucket>) -> String {
    bucket
        .map(|b| b.rounded_percent().to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn render_tooltip(resp: &UsageResponse, now: DateTime<Utc>) -> String {
    let mut lines = Vec::new();
    if let Some(ref five) = resp.five_hour {
        lines.push(format!(
            "5-hour: {}% (resets {})",
            five.utilization,
            format_reset_iso(&five.resets_at, now)
        ));
    }
    if let Some(ref seven) = resp.seven_day {
        lines.push(format!(
            "7-day: {}% (resets {})",
            seven.utilization,
            format_reset_iso(&seven.resets_at, now)
        ));
    }
    if lines.is_empty() {
        "No data".to_string()
    } else {
        lines.join("\n")
    }
}

/// Rendered widget, shaped like waybar's custom module protocol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetOutput {
    pub text: String,
    pub tooltip: String,
    pub class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<i64>,
    #[serde(skip)]
    pub severity: Option<Severity>,
}

/// How widget updates are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text line, colored by severity on a terminal
    #[default]
    Text,
    /// One JSON object per line
    Waybar,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "waybar" | "json" => Ok(OutputFormat::Waybar),
            _ => Err(format!("Invalid format: {}. Use 'text' or 'waybar'", s)),
        }
    }
}

impl WidgetOutput {
    /// Serialize as a single output line (no trailing newline)
    pub fn to_line(&self, format: OutputFormat, use_color: bool) -> String {
        match format {
            OutputFormat::Text => match self.severity.and_then(|s| s.ansi_color()) {
                Some(color) if use_color => format!("{}{}\x1b[0m", color, self.text),
                _ => self.text.clone(),
            },
            // Serializing plain strings and integers cannot fail
            OutputFormat::Waybar => serde_json::to_string(self).unwrap_or_default(),
        }
    }
}
