//! Editing style profile extracted from a reference timeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Quantitative pacing characteristics extracted from a reference edit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PacingProfile {
    pub avg_clip_duration_seconds: f64,
    pub min_clip_duration_seconds: f64,
    pub max_clip_duration_seconds: f64,
    pub cuts_per_minute: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialogue_clip_avg_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broll_clip_avg_seconds: Option<f64>,
}

/// Rhythm and flow characteristics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EditingRhythm {
    pub prefers_quick_cuts: bool,
    pub prefers_beat_alignment: bool,
    pub avg_cuts_per_music_phrase: f64,
    /// Low = consistent cut lengths, high = varied.
    pub cut_frequency_variance: f64,
}

/// Comprehensive style profile guiding assembly decisions.
///
/// Absent profiles are a valid, fully-specified state: the planner falls
/// back to `StyleProfile::default()` (3.0 s average clips, beat alignment
/// on, phrase-based chunking).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StyleProfile {
    pub description: String,
    pub pacing: PacingProfile,
    pub rhythm: EditingRhythm,
    pub target_cuts_per_minute: f64,
    pub target_clip_duration_range: (f64, f64),
    #[serde(default = "default_true")]
    pub prefer_beat_alignment: bool,
    /// When set, chunk the music every N beats instead of following
    /// detected musical phrases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beats_per_cut: Option<usize>,
}

fn default_true() -> bool {
    true
}

/// Default target clip length when no style profile is supplied.
pub const DEFAULT_AVG_CLIP_SECONDS: f64 = 3.0;

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            description: String::new(),
            pacing: PacingProfile {
                avg_clip_duration_seconds: DEFAULT_AVG_CLIP_SECONDS,
                min_clip_duration_seconds: 0.3,
                max_clip_duration_seconds: 8.0,
                cuts_per_minute: 20.0,
                dialogue_clip_avg_seconds: None,
                broll_clip_avg_seconds: None,
            },
            rhythm: EditingRhythm {
                prefers_quick_cuts: false,
                prefers_beat_alignment: true,
                avg_cuts_per_music_phrase: 2.5,
                cut_frequency_variance: 0.5,
            },
            target_cuts_per_minute: 20.0,
            target_clip_duration_range: (0.3, 8.0),
            prefer_beat_alignment: true,
            beats_per_cut: None,
        }
    }
}

impl StyleProfile {
    /// Target average clip duration for budgeting, honoring the documented
    /// 3.0 s fallback when the profile is absent.
    pub fn target_clip_duration(style: Option<&StyleProfile>) -> f64 {
        style
            .map(|s| s.pacing.avg_clip_duration_seconds)
            .unwrap_or(DEFAULT_AVG_CLIP_SECONDS)
    }

    /// Whether beat alignment applies, honoring the documented default (on).
    pub fn beat_alignment_enabled(style: Option<&StyleProfile>) -> bool {
        style.map(|s| s.prefer_beat_alignment).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_style_absent() {
        assert_eq!(StyleProfile::target_clip_duration(None), 3.0);
        assert!(StyleProfile::beat_alignment_enabled(None));
    }

    #[test]
    fn test_style_overrides_defaults() {
        let mut style = StyleProfile::default();
        style.pacing.avg_clip_duration_seconds = 1.5;
        style.prefer_beat_alignment = false;

        assert_eq!(StyleProfile::target_clip_duration(Some(&style)), 1.5);
        assert!(!StyleProfile::beat_alignment_enabled(Some(&style)));
    }
}
