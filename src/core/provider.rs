//! Usage source trait - the seam between the poll loop and the network

use async_trait::async_trait;
use thiserror::Error;

use super::UsageResponse;
use crate::settings::Settings;

/// Errors that can occur when fetching usage
#[derive(Debug, Error)]
pub enum FetchError {
    /// Organization id or cookie missing; no request was made
    #[error("Not configured: set organization_id and cookie")]
    NotConfigured,

    /// The endpoint answered with a non-success status
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The request never produced a response
    #[error("HTTP unknown: {0}")]
    Network(#[from] reqwest::Error),

    /// Body did not deserialize; carries the parser message
    #[error("{0}")]
    Parse(String),
}

/// Everything a source needs for one request
#[derive(Debug, Clone)]
pub struct FetchContext {
    pub organization_id: String,
    /// Raw `Cookie` header value
    pub cookie: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FetchContext {
    /// Default request timeout
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Build a context from settings, refusing when credentials are missing
    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        if !settings.is_configured() {
            return Err(FetchError::NotConfigured);
        }
        Ok(Self {
            organization_id: settings.organization_id.trim().to_string(),
            cookie: settings.cookie.trim().to_string(),
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        })
    }
}

/// A place usage readings come from
#[async_trait]
pub trait UsageSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Fetch one usage reading
    async fn fetch_usage(&self, ctx: &FetchContext) -> Result<UsageResponse, FetchError>;
}
