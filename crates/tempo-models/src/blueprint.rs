//! Timeline blueprint models - the final output of the edit planner.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Type of clip being placed on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClipType {
    Dialogue,
    Broll,
}

impl ClipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipType::Dialogue => "dialogue",
            ClipType::Broll => "broll",
        }
    }
}

/// Audio mix level for a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AudioMixLevel {
    /// 100% volume (primary audio).
    Full,
    /// 30% volume (behind dialogue).
    Dampened,
    /// 0% volume.
    Muted,
}

/// Decision for how to cut and place a single clip.
///
/// Created once and immutable; ordering by `timeline_in_seconds`
/// reconstructs the video track. Invariants: `timeline_out > timeline_in`,
/// `source_out > source_in`, and the source span equals the timeline span
/// unless `speed_factor != 1.0`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CutDecision {
    pub source_file_path: PathBuf,
    pub clip_type: ClipType,
    /// Position in the manifest's chronological clip order.
    pub clip_index: usize,

    pub source_in_seconds: f64,
    pub source_out_seconds: f64,

    pub timeline_in_seconds: f64,
    pub timeline_out_seconds: f64,

    /// Speed adjustment (1.0 = normal).
    #[serde(default = "default_speed")]
    pub speed_factor: f64,

    pub audio_level: AudioMixLevel,

    /// Which music chunk this decision belongs to.
    pub chunk_index: usize,

    /// Judgment reasoning (for debugging/review).
    pub reasoning: String,

    #[serde(default)]
    pub rotation_degrees: u16,
}

fn default_speed() -> f64 {
    1.0
}

impl CutDecision {
    /// Duration of the source material consumed by this decision.
    pub fn source_duration(&self) -> f64 {
        self.source_out_seconds - self.source_in_seconds
    }

    /// Duration this decision occupies on the timeline.
    pub fn timeline_duration(&self) -> f64 {
        self.timeline_out_seconds - self.timeline_in_seconds
    }
}

/// All cut decisions for a single music chunk.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChunkDecisions {
    pub chunk_index: usize,
    pub chunk_start_seconds: f64,
    pub chunk_end_seconds: f64,
    pub decisions: Vec<CutDecision>,
}

/// A music bed to include in the timeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AudioTrackInfo {
    pub file_path: PathBuf,
    pub duration_seconds: f64,
    /// Where in the source file to start (usually 0).
    #[serde(default)]
    pub source_in_seconds: f64,
    /// Where in the source file to end (usually full duration).
    pub source_out_seconds: f64,
    /// Where on the timeline this audio starts.
    #[serde(default)]
    pub timeline_in_seconds: f64,
    /// Volume level (0.0 to 1.0).
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// Ducked sub-segments, when the bed has been sliced around dialogue.
    /// Empty until the ducking segmenter has run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<AudioSegment>,
}

fn default_volume() -> f64 {
    1.0
}

impl AudioTrackInfo {
    /// The portion of the source actually available on the timeline.
    pub fn available_duration(&self) -> f64 {
        self.source_out_seconds - self.source_in_seconds
    }
}

/// One sub-clip of a music bed with its own volume.
///
/// Source time stays contiguous across segments even though the timeline
/// is split into full-volume and ducked spans.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AudioSegment {
    pub source_in_seconds: f64,
    pub source_out_seconds: f64,
    pub timeline_in_seconds: f64,
    pub timeline_out_seconds: f64,
    pub volume: f64,
    /// True when this segment sits under a dialogue window.
    pub ducked: bool,
}

impl AudioSegment {
    pub fn timeline_duration(&self) -> f64 {
        self.timeline_out_seconds - self.timeline_in_seconds
    }
}

/// Complete timeline blueprint - final output of the edit planner.
///
/// Immutable once built; the renderer converts it into an interchange
/// timeline file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TimelineBlueprint {
    pub total_duration_seconds: f64,
    pub frame_rate: f64,
    pub chunk_decisions: Vec<ChunkDecisions>,
    pub audio_tracks: Vec<AudioTrackInfo>,
}

impl TimelineBlueprint {
    /// All decisions flattened across chunks, sorted by timeline position.
    pub fn all_decisions(&self) -> Vec<&CutDecision> {
        let mut decisions: Vec<&CutDecision> = self
            .chunk_decisions
            .iter()
            .flat_map(|chunk| &chunk.decisions)
            .collect();
        decisions.sort_by(|a, b| a.timeline_in_seconds.total_cmp(&b.timeline_in_seconds));
        decisions
    }

    /// Only dialogue decisions, in timeline order.
    pub fn dialogue_decisions(&self) -> Vec<&CutDecision> {
        self.all_decisions()
            .into_iter()
            .filter(|d| d.clip_type == ClipType::Dialogue)
            .collect()
    }

    /// Only B-roll decisions, in timeline order.
    pub fn broll_decisions(&self) -> Vec<&CutDecision> {
        self.all_decisions()
            .into_iter()
            .filter(|d| d.clip_type == ClipType::Broll)
            .collect()
    }

    /// Timeline windows occupied by dialogue, for audio ducking.
    pub fn dialogue_windows(&self) -> Vec<(f64, f64)> {
        self.dialogue_decisions()
            .iter()
            .map(|d| (d.timeline_in_seconds, d.timeline_out_seconds))
            .collect()
    }
}
