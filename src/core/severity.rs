//! Usage severity
//!
//! Maps a utilization percentage onto the three levels the widget colors by.

use serde::{Deserialize, Serialize};

/// Utilization at or above this is `High`
pub const HIGH_THRESHOLD: f64 = 80.0;

/// Utilization at or above this (and below `HIGH_THRESHOLD`) is `Medium`
pub const MEDIUM_THRESHOLD: f64 = 50.0;

/// Severity level derived from utilization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    /// Classify a utilization percentage
    pub fn from_utilization(percent: f64) -> Self {
        if percent >= HIGH_THRESHOLD {
            Severity::High
        } else if percent >= MEDIUM_THRESHOLD {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// CSS class name used by waybar-style output
    pub fn class_name(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// ANSI color escape for terminal output, `None` for the default color
    pub fn ansi_color(&self) -> Option<&'static str> {
        match self {
            Severity::Low => None,
            Severity::Medium => Some("\x1b[33m"), // Yellow
            Severity::High => Some("\x1b[31m"),   // Red
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_utilization_low() {
        assert_eq!(Severity::from_utilization(0.0), Severity::Low);
        assert_eq!(Severity::from_utilization(12.5), Severity::Low);
        assert_eq!(Severity::from_utilization(49.99), Severity::Low);
    }

    #[test]
    fn test_from_utilization_medium() {
        assert_eq!(Severity::from_utilization(50.0), Severity::Medium);
        assert_eq!(Severity::from_utilization(65.0), Severity::Medium);
        assert_eq!(Severity::from_utilization(79.9), Severity::Medium);
    }

    #[test]
    fn test_from_utilization_high() {
        assert_eq!(Severity::from_utilization(80.0), Severity::High);
        assert_eq!(Severity::from_utilization(100.0), Severity::High);
        // Overage can push utilization past 100
        assert_eq!(Severity::from_utilization(140.0), Severity::High);
    }

    #[test]
    fn test_thresholds_sweep() {
        for tenth in 0..=1500 {
            let pct = tenth as f64 / 10.0;
            let expected = if pct >= 80.0 {
                Severity::High
            } else if pct >= 50.0 {
                Severity::Medium
            } else {
                Severity::Low
            };
            assert_eq!(Severity::from_utilization(pct), expected, "pct = {}", pct);
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::High > Severity::Medium);
    }

    #[test]
    fn test_class_name_and_color() {
        assert_eq!(Severity::Low.class_name(), "low");
        assert_eq!(Severity::High.class_name(), "high");
        assert!(Severity::Low.ansi_color().is_none());
        assert_eq!(Severity::Medium.ansi_color(), Some("\x1b[33m"));
    }
}
