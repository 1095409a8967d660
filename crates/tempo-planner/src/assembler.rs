//! Cut-decision assembly - the planner's core state machine.
//!
//! Chunks are processed strictly in order because each chunk's starting
//! timeline cursor is the previous chunk's ending cursor. Within a chunk
//! the judgment calls fan out concurrently through the bounded invoker;
//! the cursor arithmetic itself is a single sequential pass, keyed by clip
//! index rather than completion order.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use tempo_models::{
    AssemblyInput, AudioMixLevel, AudioTrackInfo, ChunkDecisions, ClipForAssembly, ClipType,
    CutDecision, StyleProfile, TimelineBlueprint,
};
use tempo_oracle::{ClassificationResult, ClipJudge, CutPointDecision, QualityDecision,
    QualityVerdict};

use crate::beat::{self, BeatSnapPolicy};
use crate::chunker::{compute_chunk_boundaries, compute_segment_budget, ChunkContext};
use crate::config::{PlannerConfig, QualityFilterMode};
use crate::ducking::duck_blueprint;
use crate::error::{PlannerError, PlannerResult};
use crate::invoker::{Invoker, RetryPolicy};

/// Service that plans video edits into a timeline blueprint.
pub struct EditPlanner {
    judge: Arc<dyn ClipJudge>,
    invoker: Invoker,
    config: PlannerConfig,
}

impl EditPlanner {
    /// Create a planner around a judgment service.
    ///
    /// The concurrency gate is constructed here, once per planner, and
    /// shared by every fan-out across the whole run.
    pub fn new(judge: Arc<dyn ClipJudge>, config: PlannerConfig) -> Self {
        let invoker = Invoker::new(
            config.max_concurrent_calls,
            RetryPolicy {
                max_retries: config.max_retries,
                base_delay: config.retry_base_delay,
            },
        );
        Self {
            judge,
            invoker,
            config,
        }
    }

    /// Cancel the run: judgment calls that have not started will not begin.
    pub fn cancel(&self) {
        self.invoker.cancel();
    }

    /// Assemble clips into a timeline blueprint.
    pub async fn plan(&self, input: &AssemblyInput) -> PlannerResult<TimelineBlueprint> {
        input.manifest.validate()?;

        let music = input
            .manifest
            .audio_assets
            .first()
            .ok_or(PlannerError::MissingAudio)?;
        if music.duration_seconds <= 0.0 {
            return Err(PlannerError::invalid_input(
                "music track has zero total duration",
            ));
        }

        let style = input.style_profile.as_ref();
        let analysis = &music.metronome_analysis;
        let boundaries = compute_chunk_boundaries(
            &analysis.beat_grid,
            &analysis.chop_points,
            music.duration_seconds,
            style,
        );
        let total_chunks = boundaries.len() - 1;

        let clips: Vec<ClipForAssembly> = input
            .manifest
            .video_assets
            .iter()
            .enumerate()
            .map(|(idx, asset)| ClipForAssembly::from_annotation(idx, asset))
            .collect();

        info!(
            clips = clips.len(),
            chunks = total_chunks,
            "planning timeline"
        );

        // Classification does not depend on chunk context: run it once for
        // every clip, up front.
        let classifications = self.classify_all(&clips).await?;

        let mut chunk_decisions_list: Vec<ChunkDecisions> = Vec::new();
        let mut timeline_cursor = 0.0;
        let mut clip_cursor = 0usize;

        for chunk_index in 0..total_chunks {
            let chunk_start = boundaries[chunk_index];
            let chunk_end = boundaries[chunk_index + 1];
            let chunk_duration = chunk_end - chunk_start;

            let remaining_clips = clips.len() - clip_cursor;
            if remaining_clips == 0 {
                continue;
            }

            let budget = compute_segment_budget(
                chunk_duration,
                remaining_clips,
                total_chunks - chunk_index,
                style,
            );
            if budget.clip_count == 0 {
                continue;
            }

            debug!(
                chunk_index,
                clip_count = budget.clip_count,
                avg_duration = budget.avg_duration_seconds,
                "chunk budget"
            );

            let chunk_clips = clips[clip_cursor..clip_cursor + budget.clip_count].to_vec();
            let context = ChunkContext {
                chunk_index,
                chunk_start_seconds: chunk_start,
                chunk_end_seconds: chunk_end,
                chunk_duration_seconds: chunk_duration,
                clips: chunk_clips,
                previous_chunk_end_clip_index: clip_cursor.checked_sub(1),
            };
            clip_cursor += budget.clip_count;

            let chunk_beats = context.beats_within(&analysis.beat_grid);
            let decisions = self
                .process_chunk(
                    &context,
                    timeline_cursor,
                    style,
                    budget.avg_duration_seconds,
                    &chunk_beats,
                    &classifications,
                )
                .await?;

            if let Some(last) = decisions.decisions.last() {
                timeline_cursor = last.timeline_out_seconds;
            }
            chunk_decisions_list.push(decisions);
        }

        let audio_tracks: Vec<AudioTrackInfo> = input
            .manifest
            .audio_assets
            .iter()
            .map(|audio| AudioTrackInfo {
                file_path: audio.file_path.clone(),
                duration_seconds: audio.duration_seconds,
                source_in_seconds: 0.0,
                source_out_seconds: audio.duration_seconds.min(timeline_cursor),
                timeline_in_seconds: 0.0,
                volume: 1.0,
                segments: Vec::new(),
            })
            .collect();

        let mut blueprint = TimelineBlueprint {
            total_duration_seconds: timeline_cursor,
            frame_rate: input.target_frame_rate,
            chunk_decisions: chunk_decisions_list,
            audio_tracks,
        };

        duck_blueprint(&mut blueprint, self.config.duck_volume);

        let total_cuts: usize = blueprint
            .chunk_decisions
            .iter()
            .map(|c| c.decisions.len())
            .sum();
        info!(
            cuts = total_cuts,
            duration = blueprint.total_duration_seconds,
            "generated blueprint"
        );

        Ok(blueprint)
    }

    /// Classify every clip concurrently, keyed by clip index.
    async fn classify_all(
        &self,
        clips: &[ClipForAssembly],
    ) -> PlannerResult<HashMap<usize, ClassificationResult>> {
        let items = clips
            .iter()
            .map(|clip| {
                let judge = self.judge.clone();
                let clip = clip.clone();
                (clip.clip_index, move || {
                    let judge = judge.clone();
                    let clip = clip.clone();
                    async move { judge.classify(&clip).await.map_err(PlannerError::from) }
                })
            })
            .collect();

        self.invoker.run_all(items, PlannerError::is_transient).await
    }

    /// Run the quality filter for a chunk's clips.
    async fn filter_quality(
        &self,
        context: &ChunkContext,
    ) -> PlannerResult<HashMap<usize, QualityVerdict>> {
        match self.config.quality_filter {
            QualityFilterMode::AlwaysInclude => Ok(context
                .clips
                .iter()
                .map(|clip| (clip.clip_index, QualityVerdict::always_include()))
                .collect()),
            QualityFilterMode::Oracle => {
                let chunk_duration = context.chunk_duration_seconds;
                let items = context
                    .clips
                    .iter()
                    .map(|clip| {
                        let judge = self.judge.clone();
                        let clip = clip.clone();
                        (clip.clip_index, move || {
                            let judge = judge.clone();
                            let clip = clip.clone();
                            async move {
                                judge
                                    .evaluate_quality(&clip, chunk_duration)
                                    .await
                                    .map_err(PlannerError::from)
                            }
                        })
                    })
                    .collect();

                self.invoker.run_all(items, PlannerError::is_transient).await
            }
        }
    }

    /// Choose cut points for all passing clips concurrently.
    async fn choose_all_cut_points(
        &self,
        clips: &[ClipForAssembly],
        target_duration: f64,
        classifications: &HashMap<usize, ClassificationResult>,
        style: Option<&StyleProfile>,
    ) -> PlannerResult<HashMap<usize, CutPointDecision>> {
        let items = clips
            .iter()
            .map(|clip| {
                let judge = self.judge.clone();
                let clip = clip.clone();
                let style = style.cloned();
                let is_dialogue = classifications
                    .get(&clip.clip_index)
                    .map(|c| c.classification.is_dialogue())
                    .unwrap_or(false);
                (clip.clip_index, move || {
                    let judge = judge.clone();
                    let clip = clip.clone();
                    let style = style.clone();
                    async move {
                        judge
                            .choose_cut_points(&clip, target_duration, is_dialogue, style.as_ref())
                            .await
                            .map_err(PlannerError::from)
                    }
                })
            })
            .collect();

        self.invoker.run_all(items, PlannerError::is_transient).await
    }

    /// Process one chunk: filter, fan out cut-point calls, then assemble
    /// decisions sequentially along the timeline cursor.
    async fn process_chunk(
        &self,
        context: &ChunkContext,
        timeline_cursor: f64,
        style: Option<&StyleProfile>,
        target_clip_duration: f64,
        chunk_beats: &[f64],
        classifications: &HashMap<usize, ClassificationResult>,
    ) -> PlannerResult<ChunkDecisions> {
        let quality = self.filter_quality(context).await?;

        let passing: Vec<&ClipForAssembly> = context
            .clips
            .iter()
            .filter(|clip| {
                let verdict = &quality[&clip.clip_index];
                if verdict.decision == QualityDecision::Skip {
                    info!(
                        clip_index = clip.clip_index,
                        reason = %verdict.reasoning,
                        "skipping clip"
                    );
                    false
                } else {
                    true
                }
            })
            .collect();

        let mut decisions = Vec::new();
        if passing.is_empty() {
            return Ok(ChunkDecisions {
                chunk_index: context.chunk_index,
                chunk_start_seconds: context.chunk_start_seconds,
                chunk_end_seconds: context.chunk_end_seconds,
                decisions,
            });
        }

        let passing_owned: Vec<ClipForAssembly> = passing.iter().map(|c| (*c).clone()).collect();
        let cut_points = self
            .choose_all_cut_points(&passing_owned, target_clip_duration, classifications, style)
            .await?;

        let align_to_beats = StyleProfile::beat_alignment_enabled(style);
        let policy = if align_to_beats {
            self.config.beat_snap
        } else {
            BeatSnapPolicy::Off
        };

        let mut current_timeline = timeline_cursor;

        for clip in &passing_owned {
            let classification = &classifications[&clip.clip_index];
            let is_dialogue = classification.classification.is_dialogue();
            let clip_type = if is_dialogue {
                ClipType::Dialogue
            } else {
                ClipType::Broll
            };

            let cut = &cut_points[&clip.clip_index];
            let source_in = cut.source_in_seconds.max(0.0);
            let mut source_out = cut.source_out_seconds.min(clip.duration_seconds);
            if source_out <= source_in {
                source_out = (source_in + 0.5).min(clip.duration_seconds);
            }

            let clip_duration = source_out - source_in;
            let mut timeline_out = current_timeline + clip_duration;

            // Dialogue is never snapped; speech integrity wins over rhythm.
            if !is_dialogue && !chunk_beats.is_empty() {
                let snapped = beat::apply_snap(
                    policy,
                    current_timeline,
                    timeline_out,
                    chunk_beats,
                    clip.duration_seconds - source_in,
                );
                timeline_out = snapped.timeline_out;
                source_out = source_in + (timeline_out - current_timeline);
            }

            let audio_level = if is_dialogue {
                AudioMixLevel::Full
            } else {
                AudioMixLevel::Muted
            };

            decisions.push(CutDecision {
                source_file_path: PathBuf::from(&clip.file_path),
                clip_type,
                clip_index: clip.clip_index,
                source_in_seconds: source_in,
                source_out_seconds: source_out,
                timeline_in_seconds: current_timeline,
                timeline_out_seconds: timeline_out,
                speed_factor: 1.0,
                audio_level,
                chunk_index: context.chunk_index,
                reasoning: format!("{}: {}", clip_type.as_str(), cut.reasoning),
                rotation_degrees: clip.rotation_degrees,
            });

            current_timeline = timeline_out;
        }

        Ok(ChunkDecisions {
            chunk_index: context.chunk_index,
            chunk_start_seconds: context.chunk_start_seconds,
            chunk_end_seconds: context.chunk_end_seconds,
            decisions,
        })
    }
}
