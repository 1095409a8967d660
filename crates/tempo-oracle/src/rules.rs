//! Deterministic rule-based judge.
//!
//! The testable baseline behind the same interface as the remote oracle.
//! Classification leans on duration and speech confidence; cut points
//! preserve full speech for dialogue and fit the best stable window for
//! B-roll.

use async_trait::async_trait;
use tracing::debug;

use tempo_models::{ClipForAssembly, StyleProfile};

use crate::error::OracleResult;
use crate::judge::ClipJudge;
use crate::types::{
    Classification, ClassificationResult, CutPointDecision, QualityDecision, QualityVerdict,
};

/// Duration above which a clip strongly suggests intentional dialogue.
const LONG_CLIP_SECONDS: f64 = 6.0;
/// Duration below which a low-confidence clip is treated as B-roll.
const SHORT_CLIP_SECONDS: f64 = 3.0;
/// Speech confidence threshold separating dialogue from incidental audio.
const SPEECH_CONFIDENCE_THRESHOLD: f64 = 0.5;
/// Padding added around the speech span of dialogue clips.
const SPEECH_PADDING_SECONDS: f64 = 0.2;
/// Minimum duration any cut decision may produce.
const MIN_CUT_SECONDS: f64 = 0.3;
/// Minimum tripod score for usable B-roll.
const MIN_BROLL_TRIPOD_SCORE: f64 = 1.0;

/// Rule-based implementation of [`ClipJudge`].
#[derive(Debug, Clone, Default)]
pub struct RuleBasedJudge;

impl RuleBasedJudge {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClipJudge for RuleBasedJudge {
    async fn classify(&self, clip: &ClipForAssembly) -> OracleResult<ClassificationResult> {
        let confidence = clip.speech_confidence.unwrap_or(0.0);

        let (classification, reasoning) = if clip.duration_seconds > LONG_CLIP_SECONDS
            && confidence >= SPEECH_CONFIDENCE_THRESHOLD
        {
            (
                Classification::Dialogue,
                format!(
                    "long clip ({:.1}s) with confident speech ({:.0}%)",
                    clip.duration_seconds,
                    confidence * 100.0
                ),
            )
        } else if clip.duration_seconds < SHORT_CLIP_SECONDS
            && confidence < SPEECH_CONFIDENCE_THRESHOLD
        {
            (
                Classification::Broll,
                format!(
                    "short clip ({:.1}s) with weak speech signal",
                    clip.duration_seconds
                ),
            )
        } else if clip.has_speech
            && confidence >= SPEECH_CONFIDENCE_THRESHOLD
            && !clip.transcript.trim().is_empty()
        {
            (
                Classification::Dialogue,
                format!("coherent transcript at {:.0}% confidence", confidence * 100.0),
            )
        } else {
            (
                Classification::Broll,
                "no confident, coherent speech content".to_string(),
            )
        };

        debug!(
            clip_index = clip.clip_index,
            classification = ?classification,
            "classified clip"
        );

        Ok(ClassificationResult {
            classification,
            reasoning,
        })
    }

    async fn choose_cut_points(
        &self,
        clip: &ClipForAssembly,
        target_duration_seconds: f64,
        is_dialogue: bool,
        _style: Option<&StyleProfile>,
    ) -> OracleResult<CutPointDecision> {
        let duration = clip.duration_seconds;

        // Degenerate clip: no usable duration at all. Emit a minimal
        // positive-length decision rather than an error.
        if duration <= 0.0 {
            return Ok(CutPointDecision {
                source_in_seconds: 0.0,
                source_out_seconds: 0.5,
                reasoning: "degenerate clip, minimal fallback window".to_string(),
            });
        }

        if is_dialogue {
            if let (Some(speech_start), Some(speech_end)) =
                (clip.speech_start_seconds, clip.speech_end_seconds)
            {
                // Full speech with padding; target duration is ignored.
                return Ok(CutPointDecision {
                    source_in_seconds: (speech_start - SPEECH_PADDING_SECONDS).max(0.0),
                    source_out_seconds: (speech_end + SPEECH_PADDING_SECONDS).min(duration),
                    reasoning: format!(
                        "full speech span {:.2}s-{:.2}s with padding",
                        speech_start, speech_end
                    ),
                });
            }
            // Dialogue without detected speech timing: keep the whole clip.
            return Ok(CutPointDecision {
                source_in_seconds: 0.0,
                source_out_seconds: duration,
                reasoning: "dialogue without speech timing, using full clip".to_string(),
            });
        }

        let (mut source_in, mut source_out, reasoning) = match (
            clip.best_stable_window_start,
            clip.best_stable_window_end,
        ) {
            (Some(window_start), Some(window_end)) => {
                let start = window_start.clamp(0.0, duration);
                let end = (start + target_duration_seconds).min(window_end).min(duration);
                (
                    start,
                    end,
                    format!(
                        "stable window {:.2}s-{:.2}s fitted to {:.2}s target",
                        window_start, window_end, target_duration_seconds
                    ),
                )
            }
            _ => {
                // No stable window: take the middle portion of the clip.
                let start = ((duration - target_duration_seconds) / 2.0).max(0.0);
                let end = (start + target_duration_seconds).min(duration);
                (
                    start,
                    end,
                    format!(
                        "no stable window, middle {:.2}s portion",
                        end - start
                    ),
                )
            }
        };

        if source_out - source_in < MIN_CUT_SECONDS {
            source_out = (source_in + MIN_CUT_SECONDS).min(duration);
        }
        if source_out <= source_in {
            source_in = 0.0;
            source_out = duration.min(0.5);
        }

        Ok(CutPointDecision {
            source_in_seconds: source_in,
            source_out_seconds: source_out,
            reasoning,
        })
    }

    async fn evaluate_quality(
        &self,
        clip: &ClipForAssembly,
        _chunk_duration_seconds: f64,
    ) -> OracleResult<QualityVerdict> {
        let usable_duration = if clip.has_speech {
            match (clip.speech_start_seconds, clip.speech_end_seconds) {
                (Some(start), Some(end)) => end - start,
                _ => clip.duration_seconds,
            }
        } else {
            match (clip.best_stable_window_start, clip.best_stable_window_end) {
                (Some(start), Some(end)) => end - start,
                _ => clip.duration_seconds,
            }
        };

        if usable_duration < MIN_CUT_SECONDS {
            return Ok(QualityVerdict {
                decision: QualityDecision::Skip,
                confidence: 0.9,
                reasoning: format!("usable duration {:.2}s below minimum", usable_duration),
            });
        }

        if !clip.has_speech {
            if let Some(score) = clip.tripod_score {
                if score < MIN_BROLL_TRIPOD_SCORE {
                    return Ok(QualityVerdict {
                        decision: QualityDecision::Skip,
                        confidence: 0.8,
                        reasoning: format!("tripod score {:.2} indicates unusable camera motion", score),
                    });
                }
            }
        }

        Ok(QualityVerdict {
            decision: QualityDecision::Include,
            confidence: 0.9,
            reasoning: format!("{:.2}s of usable content", usable_duration),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broll_clip(duration: f64) -> ClipForAssembly {
        ClipForAssembly {
            clip_index: 0,
            file_path: "/footage/a.mp4".to_string(),
            duration_seconds: duration,
            has_speech: false,
            transcript: String::new(),
            speech_confidence: None,
            speech_start_seconds: None,
            speech_end_seconds: None,
            best_stable_window_start: None,
            best_stable_window_end: None,
            tripod_score: None,
            rotation_degrees: 0,
        }
    }

    fn dialogue_clip() -> ClipForAssembly {
        ClipForAssembly {
            clip_index: 1,
            file_path: "/footage/talk.mp4".to_string(),
            duration_seconds: 8.0,
            has_speech: true,
            transcript: "so today we're looking at the harbor".to_string(),
            speech_confidence: Some(0.9),
            speech_start_seconds: Some(1.0),
            speech_end_seconds: Some(7.0),
            best_stable_window_start: None,
            best_stable_window_end: None,
            tripod_score: None,
            rotation_degrees: 0,
        }
    }

    #[tokio::test]
    async fn test_long_confident_clip_is_dialogue() {
        let judge = RuleBasedJudge::new();
        let result = judge.classify(&dialogue_clip()).await.unwrap();
        assert_eq!(result.classification, Classification::Dialogue);
    }

    #[tokio::test]
    async fn test_short_quiet_clip_is_broll() {
        let judge = RuleBasedJudge::new();
        let mut clip = broll_clip(2.0);
        clip.speech_confidence = Some(0.2);
        let result = judge.classify(&clip).await.unwrap();
        assert_eq!(result.classification, Classification::Broll);
    }

    #[tokio::test]
    async fn test_dialogue_cut_points_preserve_full_speech() {
        let judge = RuleBasedJudge::new();
        let clip = dialogue_clip();
        // Tiny target must not trim speech.
        let cut = judge.choose_cut_points(&clip, 0.5, true, None).await.unwrap();
        assert!((cut.source_in_seconds - 0.8).abs() < 1e-9);
        assert!((cut.source_out_seconds - 7.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_broll_uses_middle_without_stable_window() {
        let judge = RuleBasedJudge::new();
        let cut = judge
            .choose_cut_points(&broll_clip(10.0), 2.0, false, None)
            .await
            .unwrap();
        assert!((cut.source_in_seconds - 4.0).abs() < 1e-9);
        assert!((cut.source_out_seconds - 6.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_broll_fits_stable_window_to_target() {
        let judge = RuleBasedJudge::new();
        let mut clip = broll_clip(10.0);
        clip.best_stable_window_start = Some(2.0);
        clip.best_stable_window_end = Some(8.0);
        clip.tripod_score = Some(2.5);

        let cut = judge.choose_cut_points(&clip, 3.0, false, None).await.unwrap();
        assert!((cut.source_in_seconds - 2.0).abs() < 1e-9);
        assert!((cut.source_out_seconds - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_minimum_duration_floor() {
        let judge = RuleBasedJudge::new();
        let mut clip = broll_clip(5.0);
        clip.best_stable_window_start = Some(1.0);
        clip.best_stable_window_end = Some(1.1);

        let cut = judge.choose_cut_points(&clip, 0.1, false, None).await.unwrap();
        assert!(cut.duration() >= 0.3 - 1e-9);
    }

    #[tokio::test]
    async fn test_degenerate_clip_never_yields_empty_cut() {
        let judge = RuleBasedJudge::new();
        let cut = judge
            .choose_cut_points(&broll_clip(0.0), 2.0, false, None)
            .await
            .unwrap();
        assert!(cut.duration() > 0.0);
    }

    #[tokio::test]
    async fn test_quality_skips_shaky_broll() {
        let judge = RuleBasedJudge::new();
        let mut clip = broll_clip(4.0);
        clip.best_stable_window_start = Some(0.0);
        clip.best_stable_window_end = Some(4.0);
        clip.tripod_score = Some(0.4);

        let verdict = judge.evaluate_quality(&clip, 3.0).await.unwrap();
        assert_eq!(verdict.decision, QualityDecision::Skip);
    }

    #[tokio::test]
    async fn test_quality_includes_clear_dialogue() {
        let judge = RuleBasedJudge::new();
        let verdict = judge.evaluate_quality(&dialogue_clip(), 3.0).await.unwrap();
        assert_eq!(verdict.decision, QualityDecision::Include);
    }
}
