//! Claude provider implementation
//!
//! Fetches the organization usage endpoint on claude.ai using the browser
//! session cookie. Tracks the 5-hour and 7-day rolling windows.

use async_trait::async_trait;
use std::time::Duration;

use crate::core::{FetchContext, FetchError, UsageResponse, UsageSource};

const CLAUDE_API_BASE: &str = "https://claude.ai";

/// Page opened by the `open` command
pub const USAGE_PAGE_URL: &str = "https://claude.ai/settings/usage";

/// The endpoint rejects unknown clients; this identifier is accepted
const CLIENT_USER_AGENT: &str = "PostmanRuntime/7.51.0";

/// Claude web usage source
pub struct ClaudeProvider {
    base_url: String,
    no_proxy: bool,
}

impl ClaudeProvider {
    pub fn new() -> Self {
        Self::with_base_url(CLAUDE_API_BASE)
    }

    /// Point the provider at a different host
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            no_proxy: false,
        }
    }

    /// Ignore `HTTP(S)_PROXY` from the environment
    pub fn without_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    /// Usage endpoint for an organization
    pub fn usage_url(&self, organization_id: &str) -> String {
        format!(
            "{}/api/organizations/{}/usage",
            self.base_url, organization_id
        )
    }
}

impl Default for ClaudeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageSource for ClaudeProvider {
    fn name(&self) -> &'static str {
        "claude"
    }

    async fn fetch_usage(&self, ctx: &FetchContext) -> Result<UsageResponse, FetchError> {
        let url = self.usage_url(&ctx.organization_id);
        tracing::debug!(url = %url, "Fetching Claude usage");

        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(ctx.timeout_secs));
        if self.no_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        let resp = client
            .get(&url)
            .header(reqwest::header::COOKIE, &ctx.cookie)
            .header(reqwest::header::USER_AGENT, CLIENT_USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Usage request rejected");
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = resp.text().await?;
        let usage = UsageResponse::from_json(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        tracing::debug!(
            five_hour = ?usage.five_hour.as_ref().map(|b| b.utilization),
            seven_day = ?usage.seven_day.as_ref().map(|b| b.utilization),
            "Parsed Claude usage"
        );

        Ok(usage)
    }
}
