//! Audio ducking: slice music beds into full-volume and ducked segments
//! around dialogue windows.
//!
//! Segments tile the track's timeline span exactly, with no gaps or
//! overlaps, and source time stays contiguous across the splits so the
//! renderer can play the bed straight through at varying volume.

use tempo_models::{AudioSegment, AudioTrackInfo, TimelineBlueprint};
use tracing::debug;

/// Merge sorted, possibly-overlapping windows into disjoint spans.
///
/// Adjacent windows (next start equals current end) merge too, so
/// back-to-back dialogue produces one continuous ducked span.
fn merge_windows(windows: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut sorted: Vec<(f64, f64)> = windows
        .iter()
        .copied()
        .filter(|(start, end)| end > start)
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f64, f64)> = Vec::new();
    for (start, end) in sorted {
        match merged.last_mut() {
            Some((_, current_end)) if start <= *current_end => {
                *current_end = current_end.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Split one music bed into segments ducked under the given dialogue
/// windows.
///
/// Windows outside the track's timeline span are clipped away; a track
/// with no dialogue overlap comes back as a single full-volume segment.
pub fn build_ducked_track(
    track: &AudioTrackInfo,
    dialogue_windows: &[(f64, f64)],
    duck_volume: f64,
) -> Vec<AudioSegment> {
    let track_start = track.timeline_in_seconds;
    let track_end = track_start + track.available_duration();
    if track_end <= track_start {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut timeline_cursor = track_start;
    let mut source_cursor = track.source_in_seconds;

    let push = |timeline_in: f64,
                    timeline_out: f64,
                    source_cursor: &mut f64,
                    ducked: bool,
                    segments: &mut Vec<AudioSegment>| {
        let span = timeline_out - timeline_in;
        if span <= 0.0 {
            return;
        }
        segments.push(AudioSegment {
            source_in_seconds: *source_cursor,
            source_out_seconds: *source_cursor + span,
            timeline_in_seconds: timeline_in,
            timeline_out_seconds: timeline_out,
            volume: if ducked { duck_volume } else { track.volume },
            ducked,
        });
        *source_cursor += span;
    };

    for (start, end) in merge_windows(dialogue_windows) {
        let start = start.max(track_start);
        let end = end.min(track_end);
        if end <= start {
            continue;
        }
        push(timeline_cursor, start, &mut source_cursor, false, &mut segments);
        push(start, end, &mut source_cursor, true, &mut segments);
        timeline_cursor = end;
    }
    push(
        timeline_cursor,
        track_end,
        &mut source_cursor,
        false,
        &mut segments,
    );

    segments
}

/// Duck every audio track in the blueprint under its dialogue windows.
pub fn duck_blueprint(blueprint: &mut TimelineBlueprint, duck_volume: f64) {
    let windows = blueprint.dialogue_windows();
    debug!(windows = windows.len(), "ducking audio tracks");
    for track in &mut blueprint.audio_tracks {
        track.segments = build_ducked_track(track, &windows, duck_volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn track(duration: f64) -> AudioTrackInfo {
        AudioTrackInfo {
            file_path: PathBuf::from("/music/track.wav"),
            duration_seconds: duration,
            source_in_seconds: 0.0,
            source_out_seconds: duration,
            timeline_in_seconds: 0.0,
            volume: 1.0,
            segments: Vec::new(),
        }
    }

    fn spans(segments: &[AudioSegment]) -> Vec<(f64, f64, f64)> {
        segments
            .iter()
            .map(|s| (s.timeline_in_seconds, s.timeline_out_seconds, s.volume))
            .collect()
    }

    #[test]
    fn test_single_window_splits_into_three() {
        let segments = build_ducked_track(&track(12.0), &[(3.0, 5.0)], 0.3);
        assert_eq!(
            spans(&segments),
            vec![(0.0, 3.0, 1.0), (3.0, 5.0, 0.3), (5.0, 12.0, 1.0)]
        );
        assert!(segments[1].ducked);
        assert!(!segments[0].ducked && !segments[2].ducked);
    }

    #[test]
    fn test_no_windows_yields_single_full_segment() {
        let segments = build_ducked_track(&track(8.0), &[], 0.3);
        assert_eq!(spans(&segments), vec![(0.0, 8.0, 1.0)]);
    }

    #[test]
    fn test_overlapping_windows_merge() {
        let segments = build_ducked_track(&track(10.0), &[(2.0, 4.0), (3.0, 6.0)], 0.3);
        assert_eq!(
            spans(&segments),
            vec![(0.0, 2.0, 1.0), (2.0, 6.0, 0.3), (6.0, 10.0, 1.0)]
        );
    }

    #[test]
    fn test_adjacent_windows_merge() {
        let segments = build_ducked_track(&track(10.0), &[(2.0, 4.0), (4.0, 6.0)], 0.3);
        assert_eq!(
            spans(&segments),
            vec![(0.0, 2.0, 1.0), (2.0, 6.0, 0.3), (6.0, 10.0, 1.0)]
        );
    }

    #[test]
    fn test_window_beyond_track_end_is_clipped() {
        let segments = build_ducked_track(&track(5.0), &[(4.0, 8.0)], 0.3);
        assert_eq!(spans(&segments), vec![(0.0, 4.0, 1.0), (4.0, 5.0, 0.3)]);
    }

    #[test]
    fn test_window_entirely_outside_track_is_ignored() {
        let segments = build_ducked_track(&track(5.0), &[(6.0, 9.0)], 0.3);
        assert_eq!(spans(&segments), vec![(0.0, 5.0, 1.0)]);
    }

    #[test]
    fn test_window_at_track_start() {
        let segments = build_ducked_track(&track(6.0), &[(0.0, 2.0)], 0.3);
        assert_eq!(spans(&segments), vec![(0.0, 2.0, 0.3), (2.0, 6.0, 1.0)]);
    }

    #[test]
    fn test_segments_tile_exactly_and_source_is_contiguous() {
        let segments = build_ducked_track(&track(12.0), &[(1.0, 2.0), (5.0, 7.5)], 0.3);

        assert_eq!(segments.first().unwrap().timeline_in_seconds, 0.0);
        assert_eq!(segments.last().unwrap().timeline_out_seconds, 12.0);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].timeline_out_seconds, pair[1].timeline_in_seconds);
            assert_eq!(pair[0].source_out_seconds, pair[1].source_in_seconds);
        }
        for segment in &segments {
            let timeline_span = segment.timeline_out_seconds - segment.timeline_in_seconds;
            let source_span = segment.source_out_seconds - segment.source_in_seconds;
            assert!((timeline_span - source_span).abs() < 1e-9);
        }
    }

    #[test]
    fn test_duck_blueprint_applies_to_all_tracks() {
        use tempo_models::{AudioMixLevel, ChunkDecisions, ClipType, CutDecision};

        let mut blueprint = TimelineBlueprint {
            total_duration_seconds: 10.0,
            frame_rate: 60.0,
            chunk_decisions: vec![ChunkDecisions {
                chunk_index: 0,
                chunk_start_seconds: 0.0,
                chunk_end_seconds: 10.0,
                decisions: vec![CutDecision {
                    source_file_path: PathBuf::from("/footage/a.mp4"),
                    clip_type: ClipType::Dialogue,
                    clip_index: 0,
                    source_in_seconds: 0.0,
                    source_out_seconds: 2.0,
                    timeline_in_seconds: 3.0,
                    timeline_out_seconds: 5.0,
                    speed_factor: 1.0,
                    audio_level: AudioMixLevel::Full,
                    chunk_index: 0,
                    reasoning: String::new(),
                    rotation_degrees: 0,
                }],
            }],
            audio_tracks: vec![{
                let mut t = track(12.0);
                t.source_out_seconds = 10.0;
                t
            }],
        };

        duck_blueprint(&mut blueprint, 0.3);

        let segments = &blueprint.audio_tracks[0].segments;
        assert_eq!(
            spans(segments),
            vec![(0.0, 3.0, 1.0), (3.0, 5.0, 0.3), (5.0, 10.0, 1.0)]
        );
    }
}
