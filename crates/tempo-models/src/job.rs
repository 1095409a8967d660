//! Plan job documents for checkpoint/resume.
//!
//! A plan job captures the full state of an edit-planning run so a
//! multi-stage pipeline can pause and resume without recomputation.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of an edit-planning job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlanJobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Paused,
}

/// Progress tracking for an edit-planning job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PlanProgress {
    pub total_clips: usize,
    pub processed_clips: usize,
    pub current_clip_index: usize,
    pub total_chunks: usize,
    pub processed_chunks: usize,
    pub current_chunk_index: usize,
}

impl PlanProgress {
    /// Clip processing progress as a percentage.
    pub fn clip_progress_percent(&self) -> f64 {
        if self.total_clips == 0 {
            return 0.0;
        }
        (self.processed_clips as f64 / self.total_clips as f64) * 100.0
    }

    /// Chunk processing progress as a percentage.
    pub fn chunk_progress_percent(&self) -> f64 {
        if self.total_chunks == 0 {
            return 0.0;
        }
        (self.processed_chunks as f64 / self.total_chunks as f64) * 100.0
    }
}

/// Persistable edit-planning job document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlanJob {
    pub job_id: String,
    pub status: PlanJobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    pub progress: PlanProgress,

    /// Chunk boundary timestamps computed for this run.
    pub chunk_boundaries: Vec<f64>,
}

impl PlanJob {
    /// Create a fresh pending job with a generated id.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            job_id: Uuid::new_v4().to_string(),
            status: PlanJobStatus::Pending,
            created_at: now,
            updated_at: now,
            error_message: None,
            progress: PlanProgress::default(),
            chunk_boundaries: Vec::new(),
        }
    }

    /// Transition to the failed state with a captured error description.
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.status = PlanJobStatus::Failed;
        self.error_message = Some(message.into());
        self.updated_at = Utc::now();
    }

    /// Transition to the completed state.
    pub fn mark_completed(&mut self) {
        self.status = PlanJobStatus::Completed;
        self.error_message = None;
        self.updated_at = Utc::now();
    }
}

impl Default for PlanJob {
    fn default() -> Self {
        Self::new()
    }
}
