//! Usage reading returned by the organization usage endpoint

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Severity;

/// One rolling usage window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageBucket {
    /// Percentage of the window's quota consumed
    pub utilization: f64,
    /// ISO-8601 timestamp when the window resets
    pub resets_at: String,
}

impl UsageBucket {
    pub fn new(utilization: f64, resets_at: impl Into<String>) -> Self {
        Self {
            utilization,
            resets_at: resets_at.into(),
        }
    }

    /// Utilization rounded to a whole percent
    pub fn rounded_percent(&self) -> i64 {
        self.utilization.round() as i64
    }
}

/// Body of `GET /api/organizations/{id}/usage`
///
/// Only the two buckets drive the widget; anything else the endpoint
/// returns is kept in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageResponse {
    #[serde(default)]
    pub five_hour: Option<UsageBucket>,
    #[serde(default)]
    pub seven_day: Option<UsageBucket>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl UsageResponse {
    pub fn new(five_hour: Option<UsageBucket>, seven_day: Option<UsageBucket>) -> Self {
        Self {
            five_hour,
            seven_day,
            extra: HashMap::new(),
        }
    }

    /// Parse a response body
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Utilization that drives the severity color (5-hour, or 0 when absent)
    pub fn primary_utilization(&self) -> f64 {
        self.five_hour.as_ref().map(|b| b.utilization).unwrap_or(0.0)
    }

    pub fn severity(&self) -> Severity {
        Severity::from_utilization(self.primary_utilization())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let body = r#"{
            "five_hour": {"utilization": 42.5, "resets_at": "2026-03-01T14:00:00+00:00"},
            "seven_day": {"utilization": 13.0, "resets_at": "2026-03-05T09:00:00+00:00"},
            "seven_day_opus": null,
            "extra_usage": {"is_enabled": false}
        }"#;
        let resp = UsageResponse::from_json(body).unwrap();

        let five = resp.five_hour.as_ref().unwrap();
        assert_eq!(five.utilization, 42.5);
        assert_eq!(five.resets_at, "2026-03-01T14:00:00+00:00");
        assert_eq!(resp.seven_day.as_ref().unwrap().utilization, 13.0);
        assert!(resp.extra.contains_key("seven_day_opus"));
        assert!(resp.extra.contains_key("extra_usage"));
    }

    #[test]
    fn test_parse_null_and_missing_buckets() {
        let resp = UsageResponse::from_json(r#"{"five_hour": null}"#).unwrap();
        assert!(resp.five_hour.is_none());
        assert!(resp.seven_day.is_none());
        assert_eq!(resp, UsageResponse::default());
    }

    #[test]
    fn test_parse_rejects_malformed_bucket() {
        let err = UsageResponse::from_json(r#"{"five_hour": {"utilization": "high"}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_rounded_percent() {
        assert_eq!(UsageBucket::new(42.4, "").rounded_percent(), 42);
        assert_eq!(UsageBucket::new(42.5, "").rounded_percent(), 43);
        assert_eq!(UsageBucket::new(0.0, "").rounded_percent(), 0);
        assert_eq!(UsageBucket::new(99.6, "").rounded_percent(), 100);
    }

    #[test]
    fn test_severity_uses_five_hour_bucket() {
        let resp = UsageResponse::new(
            Some(UsageBucket::new(85.0, "")),
            Some(UsageBucket::new(10.0, "")),
        );
        assert_eq!(resp.severity(), Severity::High);

        // Seven-day alone never raises severity
        let resp = UsageResponse::new(None, Some(UsageBucket::new(95.0, "")));
        assert_eq!(resp.primary_utilization(), 0.0);
        assert_eq!(resp.severity(), Severity::Low);
    }
}
