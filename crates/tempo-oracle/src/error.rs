//! Oracle error types.

use thiserror::Error;

pub type OracleResult<T> = Result<T, OracleError>;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OracleError {
    /// Whether a retry with backoff can reasonably succeed.
    ///
    /// This is the single transient-error classifier used by the planner's
    /// invoker; everything else fails fast.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OracleError::ServiceUnavailable(_)
                | OracleError::RateLimited(_)
                | OracleError::Timeout(_)
                | OracleError::Network(_)
        )
    }
}
