//! The `ClipJudge` trait - the seam between the planner and its oracle.

use async_trait::async_trait;
use tempo_models::{ClipForAssembly, StyleProfile};

use crate::error::OracleResult;
use crate::types::{ClassificationResult, CutPointDecision, QualityVerdict};

/// External decision-maker for per-clip judgment calls.
///
/// Implementations are pure request/response with no side effects beyond
/// the call itself. The planner treats calls as remote: latency and
/// transient failures are expected, so implementations should map
/// rate-limit and connection problems to transient [`crate::OracleError`]
/// variants.
#[async_trait]
pub trait ClipJudge: Send + Sync {
    /// Classify a clip as dialogue or B-roll.
    async fn classify(&self, clip: &ClipForAssembly) -> OracleResult<ClassificationResult>;

    /// Choose cut-in/cut-out points for a clip.
    ///
    /// Dialogue clips must keep the full speech span regardless of
    /// `target_duration_seconds`; B-roll should aim for the target.
    async fn choose_cut_points(
        &self,
        clip: &ClipForAssembly,
        target_duration_seconds: f64,
        is_dialogue: bool,
        style: Option<&StyleProfile>,
    ) -> OracleResult<CutPointDecision>;

    /// Decide whether a clip is usable at all given the current chunk.
    async fn evaluate_quality(
        &self,
        clip: &ClipForAssembly,
        chunk_duration_seconds: f64,
    ) -> OracleResult<QualityVerdict>;
}
