//! Planner error types.

use thiserror::Error;

use tempo_models::ManifestError;
use tempo_oracle::OracleError;

use crate::invoker::Cancelled;

pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid manifest: {0}")]
    InvalidManifest(#[from] ManifestError),

    #[error("No audio assets found in manifest")]
    MissingAudio,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Judgment call failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Planning cancelled")]
    Cancelled,

    #[error("Checkpoint IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Checkpoint serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether a retry with backoff can reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, PlannerError::Oracle(e) if e.is_transient())
    }
}

impl From<Cancelled> for PlannerError {
    fn from(_: Cancelled) -> Self {
        PlannerError::Cancelled
    }
}
