//! Annotated asset manifest models.
//!
//! The manifest is produced once by the upstream annotation stage (speech
//! transcription, stability scoring, music timing) and is read-only input to
//! the planner. All time lists within an asset are monotonically
//! non-decreasing; `AssetManifest::validate` enforces this before planning.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A segment of transcribed speech with timing information.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    /// Transcription confidence (0.0 to 1.0).
    pub confidence: f64,
}

/// A range of valid speech content within a clip.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SpeechRange {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub transcript_segments: Vec<TranscriptSegment>,
}

/// Speech analysis for a video asset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SpeechAnalysis {
    pub has_speech: bool,
    pub full_transcript: String,
    /// Ordered ranges of actual speech content.
    pub valid_ranges: Vec<SpeechRange>,
}

/// A window of stable, non-blurry footage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StabilityWindow {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub sharpness_score: f64,
    pub motion_score: f64,
    /// Combined stability metric; higher = steadier/sharper footage.
    pub tripod_score: f64,
}

/// Camera-stability analysis for a video asset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StabilityAnalysis {
    pub average_sharpness: f64,
    pub average_motion: f64,
    /// Ordered windows of stable footage.
    pub stable_windows: Vec<StabilityWindow>,
}

/// A detected musical beat.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BeatInfo {
    pub time_seconds: f64,
    pub strength: f64,
}

/// A detected musical onset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OnsetInfo {
    pub time_seconds: f64,
    /// Normalized onset strength (0.0 to 1.0).
    pub strength: f64,
}

/// A musically salient timestamp flagged as a good video-cut location.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChopPoint {
    pub time_seconds: f64,
    pub strength: f64,
    pub is_downbeat: bool,
}

/// Music timing analysis for an audio asset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MetronomeAnalysis {
    pub tempo_bpm: f64,
    /// Ordered beat grid.
    pub beat_grid: Vec<BeatInfo>,
    /// Ordered onset grid.
    pub onset_grid: Vec<OnsetInfo>,
    /// Ordered strong-onset points suitable for cuts/transitions.
    pub chop_points: Vec<ChopPoint>,
}

/// Annotation for a single video asset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoAssetAnnotation {
    pub file_path: PathBuf,
    pub duration_seconds: f64,
    pub speech_analysis: SpeechAnalysis,
    pub stability_analysis: StabilityAnalysis,
    /// Display rotation in degrees (0, 90, 180, or 270). Mobile footage
    /// often carries rotation metadata that must survive into the timeline.
    #[serde(default)]
    pub rotation_degrees: u16,
}

/// Annotation for a single audio (music) asset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AudioAssetAnnotation {
    pub file_path: PathBuf,
    pub duration_seconds: f64,
    pub metronome_analysis: MetronomeAnalysis,
}

/// Complete manifest of annotated assets (output of the annotation stage).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetManifest {
    pub video_assets: Vec<VideoAssetAnnotation>,
    pub audio_assets: Vec<AudioAssetAnnotation>,
}

/// Structural validation errors for an asset manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("asset {asset} has negative duration {duration}")]
    NegativeDuration { asset: String, duration: f64 },

    #[error("asset {asset}: {list} time list is not monotonically non-decreasing at index {index}")]
    NonMonotonicTimes {
        asset: String,
        list: &'static str,
        index: usize,
    },

    #[error("asset {asset}: range [{start}, {end}] is inverted")]
    InvertedRange { asset: String, start: f64, end: f64 },
}

impl AssetManifest {
    /// Validate the structural invariants the planner relies on: non-negative
    /// durations, non-inverted ranges, and monotonic time lists.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for video in &self.video_assets {
            let asset = video.file_path.display().to_string();
            if video.duration_seconds < 0.0 {
                return Err(ManifestError::NegativeDuration {
                    asset,
                    duration: video.duration_seconds,
                });
            }
            check_ranges(
                &asset,
                "speech",
                video
                    .speech_analysis
                    .valid_ranges
                    .iter()
                    .map(|r| (r.start_seconds, r.end_seconds)),
            )?;
            check_ranges(
                &asset,
                "stability",
                video
                    .stability_analysis
                    .stable_windows
                    .iter()
                    .map(|w| (w.start_seconds, w.end_seconds)),
            )?;
        }

        for audio in &self.audio_assets {
            let asset = audio.file_path.display().to_string();
            if audio.duration_seconds < 0.0 {
                return Err(ManifestError::NegativeDuration {
                    asset,
                    duration: audio.duration_seconds,
                });
            }
            let analysis = &audio.metronome_analysis;
            check_monotonic(&asset, "beat_grid", analysis.beat_grid.iter().map(|b| b.time_seconds))?;
            check_monotonic(&asset, "onset_grid", analysis.onset_grid.iter().map(|o| o.time_seconds))?;
            check_monotonic(
                &asset,
                "chop_points",
                analysis.chop_points.iter().map(|c| c.time_seconds),
            )?;
        }

        Ok(())
    }
}

fn check_monotonic(
    asset: &str,
    list: &'static str,
    times: impl Iterator<Item = f64>,
) -> Result<(), ManifestError> {
    let mut prev = f64::NEG_INFINITY;
    for (index, t) in times.enumerate() {
        if t < prev {
            return Err(ManifestError::NonMonotonicTimes {
                asset: asset.to_string(),
                list,
                index,
            });
        }
        prev = t;
    }
    Ok(())
}

fn check_ranges(
    asset: &str,
    list: &'static str,
    ranges: impl Iterator<Item = (f64, f64)>,
) -> Result<(), ManifestError> {
    let mut starts = Vec::new();
    for (start, end) in ranges {
        if end < start {
            return Err(ManifestError::InvertedRange {
                asset: asset.to_string(),
                start,
                end,
            });
        }
        starts.push(start);
    }
    check_monotonic(asset, list, starts.into_iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_speech() -> SpeechAnalysis {
        SpeechAnalysis {
            has_speech: false,
            full_transcript: String::new(),
            valid_ranges: vec![],
        }
    }

    fn empty_stability() -> StabilityAnalysis {
        StabilityAnalysis {
            average_sharpness: 0.0,
            average_motion: 0.0,
            stable_windows: vec![],
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_manifest() {
        let manifest = AssetManifest {
            video_assets: vec![VideoAssetAnnotation {
                file_path: PathBuf::from("/footage/a.mp4"),
                duration_seconds: 5.0,
                speech_analysis: empty_speech(),
                stability_analysis: empty_stability(),
                rotation_degrees: 0,
            }],
            audio_assets: vec![AudioAssetAnnotation {
                file_path: PathBuf::from("/music/track.wav"),
                duration_seconds: 30.0,
                metronome_analysis: MetronomeAnalysis {
                    tempo_bpm: 120.0,
                    beat_grid: vec![
                        BeatInfo { time_seconds: 0.0, strength: 1.0 },
                        BeatInfo { time_seconds: 0.5, strength: 0.8 },
                    ],
                    onset_grid: vec![],
                    chop_points: vec![],
                },
            }],
        };

        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_monotonic_beats() {
        let manifest = AssetManifest {
            video_assets: vec![],
            audio_assets: vec![AudioAssetAnnotation {
                file_path: PathBuf::from("/music/track.wav"),
                duration_seconds: 30.0,
                metronome_analysis: beat_grid_fixture(vec![1.0, 0.5]),
            }],
        };

        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::NonMonotonicTimes { list: "beat_grid", index: 1, .. })
        ));
    }

    fn beat_grid_fixture(beat_times: Vec<f64>) -> MetronomeAnalysis {
        MetronomeAnalysis {
            tempo_bpm: 120.0,
            beat_grid: beat_times
                .into_iter()
                .map(|t| BeatInfo { time_seconds: t, strength: 1.0 })
                .collect(),
            onset_grid: vec![],
            chop_points: vec![],
        }
    }

    #[test]
    fn test_validate_rejects_inverted_speech_range() {
        let manifest = AssetManifest {
            video_assets: vec![VideoAssetAnnotation {
                file_path: PathBuf::from("/footage/a.mp4"),
                duration_seconds: 5.0,
                speech_analysis: SpeechAnalysis {
                    has_speech: true,
                    full_transcript: "hi".to_string(),
                    valid_ranges: vec![SpeechRange {
                        start_seconds: 3.0,
                        end_seconds: 1.0,
                        transcript_segments: vec![],
                    }],
                },
                stability_analysis: empty_stability(),
                rotation_degrees: 0,
            }],
            audio_assets: vec![],
        };

        assert!(matches!(manifest.validate(), Err(ManifestError::InvertedRange { .. })));
    }
}
