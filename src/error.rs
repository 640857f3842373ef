//! Error types for the lead sync pipeline
//!
//! Two failure families:
//! - Configuration: connection settings missing or invalid. Fatal, raised
//!   before any request is made.
//! - Upstream: a page request failed or returned something we could not read.
//!   Aborts the whole fetch; no partial lead list is ever returned.
//!
//! Normalization and metrics have no error path.

use thiserror::Error;

/// Connection settings problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NOCODB_API_TOKEN is not set")]
    MissingToken,

    #[error("NocoDB base URL is not set")]
    MissingBaseUrl,

    #[error("NocoDB table id is not set")]
    MissingTableId,

    #[error("Invalid NocoDB base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Page size must be greater than zero")]
    ZeroPageSize,

    #[error("Request timeout must be at least one second")]
    ZeroTimeout,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Failed to read config: {0}")]
    Read(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Failures talking to the record source.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("NocoDB API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("NocoDB request timed out after {0} seconds")]
    Timeout(u64),

    #[error("NocoDB request failed: {0}")]
    Transport(String),

    #[error("Failed to parse NocoDB page: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl SyncError {
    /// True if a later poll cycle could plausibly succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Config(_) => false,
            SyncError::Upstream(UpstreamError::Timeout(_))
            | SyncError::Upstream(UpstreamError::Transport(_)) => true,
            SyncError::Upstream(UpstreamError::Status { status, .. }) => {
                *status == 429 || *status >= 500
            }
            SyncError::Upstream(UpstreamError::Decode(_)) => false,
        }
    }

    /// HTTP status of the failing page request, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Upstream(UpstreamError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::Config(ConfigError::MissingToken) => {
                "Set NOCODB_API_TOKEN or add apiToken to ~/.leadboard/config.json."
            }
            SyncError::Config(_) => "Check the NocoDB settings in ~/.leadboard/config.json.",
            SyncError::Upstream(UpstreamError::Status { status: 401, .. })
            | SyncError::Upstream(UpstreamError::Status { status: 403, .. }) => {
                "The API token was rejected. Generate a new token in NocoDB."
            }
            SyncError::Upstream(UpstreamError::Status { status: 404, .. }) => {
                "Verify the table and view ids."
            }
            SyncError::Upstream(UpstreamError::Status { status: 429, .. }) => {
                "NocoDB is rate limiting requests. Wait a minute and refresh."
            }
            SyncError::Upstream(UpstreamError::Status { .. }) => {
                "NocoDB returned an error. Try again shortly."
            }
            SyncError::Upstream(UpstreamError::Timeout(_)) => {
                "NocoDB took too long to respond. Try again."
            }
            SyncError::Upstream(UpstreamError::Transport(_)) => {
                "Check your internet connection and the NocoDB base URL."
            }
            SyncError::Upstream(UpstreamError::Decode(_)) => {
                "NocoDB returned an unexpected response. Check the base URL points at the API."
            }
        }
    }
}

/// Serializable error representation for the presentation layer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
    pub recovery_suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Configuration,
    Upstream,
}

impl From<&SyncError> for SyncErrorPayload {
    fn from(err: &SyncError) -> Self {
        let error_type = match err {
            SyncError::Config(_) => ErrorType::Configuration,
            SyncError::Upstream(_) => ErrorType::Upstream,
        };

        SyncErrorPayload {
            message: err.to_string(),
            error_type,
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
            status: err.status(),
        }
    }
}
