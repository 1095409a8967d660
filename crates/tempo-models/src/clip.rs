//! Clip projection used by assembly decisions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::manifest::VideoAssetAnnotation;

/// A single video asset projected into the fields that cut decisions need.
///
/// Derived once per manifest and immutable afterwards; `clip_index` is the
/// clip's stable identity across classification, cut-point selection, and
/// the final blueprint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClipForAssembly {
    pub clip_index: usize,
    pub file_path: String,
    pub duration_seconds: f64,
    pub has_speech: bool,
    pub transcript: String,
    /// Mean confidence across all transcript segments, if any speech exists.
    pub speech_confidence: Option<f64>,
    pub speech_start_seconds: Option<f64>,
    pub speech_end_seconds: Option<f64>,
    /// Best stable window, chosen as the max-tripod-score window.
    pub best_stable_window_start: Option<f64>,
    pub best_stable_window_end: Option<f64>,
    pub tripod_score: Option<f64>,
    #[serde(default)]
    pub rotation_degrees: u16,
}

impl ClipForAssembly {
    /// Project a video annotation into assembly-relevant fields.
    ///
    /// Speech bounds span from the first valid range's start to the last
    /// range's end; confidence is averaged over every transcript segment.
    pub fn from_annotation(clip_index: usize, asset: &VideoAssetAnnotation) -> Self {
        let mut speech_start = None;
        let mut speech_end = None;
        let mut speech_confidence = None;

        let ranges = &asset.speech_analysis.valid_ranges;
        if let (Some(first), Some(last)) = (ranges.first(), ranges.last()) {
            speech_start = Some(first.start_seconds);
            speech_end = Some(last.end_seconds);

            let segments: Vec<_> = ranges.iter().flat_map(|r| &r.transcript_segments).collect();
            if !segments.is_empty() {
                let total: f64 = segments.iter().map(|s| s.confidence).sum();
                speech_confidence = Some(total / segments.len() as f64);
            }
        }

        let best_window = asset
            .stability_analysis
            .stable_windows
            .iter()
            .max_by(|a, b| a.tripod_score.total_cmp(&b.tripod_score));

        Self {
            clip_index,
            file_path: asset.file_path.display().to_string(),
            duration_seconds: asset.duration_seconds,
            has_speech: asset.speech_analysis.has_speech,
            transcript: asset.speech_analysis.full_transcript.clone(),
            speech_confidence,
            speech_start_seconds: speech_start,
            speech_end_seconds: speech_end,
            best_stable_window_start: best_window.map(|w| w.start_seconds),
            best_stable_window_end: best_window.map(|w| w.end_seconds),
            tripod_score: best_window.map(|w| w.tripod_score),
            rotation_degrees: asset.rotation_degrees,
        }
    }
}
