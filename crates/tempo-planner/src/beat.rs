//! Beat-grid snapping policies for B-roll cut boundaries.
//!
//! Two policies coexist: a tolerance snap that nudges only the out-point
//! when a beat is close, and a hard dual snap that always lands the cut
//! span on the grid. Dialogue clips are never snapped - speech integrity
//! takes precedence over rhythm.

/// Maximum distance for the tolerance snap.
pub const SNAP_TOLERANCE_SECONDS: f64 = 0.15;
/// Minimum clip span after a tolerance snap.
pub const MIN_TOLERANCE_SPAN_SECONDS: f64 = 0.3;
/// Minimum clip span after a hard dual snap.
pub const MIN_DUAL_SNAP_SPAN_SECONDS: f64 = 0.25;

/// Beat-alignment policy for B-roll cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeatSnapPolicy {
    /// No beat alignment.
    Off,
    /// Snap the out-point to the nearest beat within
    /// [`SNAP_TOLERANCE_SECONDS`]; leave the cut alone otherwise.
    ToleranceSnap,
    /// Always land the cut span on the grid: the in-point sits on a beat
    /// (maintained by cursor continuity) and the out-point snaps to the
    /// next beat at or after the natural clip end. When the preceding cut
    /// was dialogue (never snapped), the in-point inherits that off-beat
    /// cursor; only the out-point is realigned.
    #[default]
    HardDualSnap,
}

/// The beat nearest to `time`, if any beats exist.
pub fn nearest_beat(time: f64, beats: &[f64]) -> Option<f64> {
    beats
        .iter()
        .copied()
        .min_by(|a, b| (a - time).abs().total_cmp(&(b - time).abs()))
}

/// The first beat at or after `time`, falling back to the last beat.
pub fn next_beat_at_or_after(time: f64, beats: &[f64]) -> Option<f64> {
    beats
        .iter()
        .copied()
        .find(|b| *b >= time)
        .or_else(|| beats.last().copied())
}

/// Snap a time to the nearest beat if within `tolerance`, else return it
/// unchanged.
pub fn snap_to_beat(time: f64, beats: &[f64], tolerance: f64) -> f64 {
    match nearest_beat(time, beats) {
        Some(beat) if (beat - time).abs() <= tolerance => beat,
        _ => time,
    }
}

/// Outcome of applying a snap policy to one candidate cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappedCut {
    /// The (possibly adjusted) timeline out-point.
    pub timeline_out: f64,
}

/// Apply a snap policy to a candidate cut starting at `timeline_in`.
///
/// `available_source` is how much source material remains after the cut's
/// in-point; a snap that would need more source than exists is rejected so
/// the source/timeline duration consistency invariant holds.
pub fn apply_snap(
    policy: BeatSnapPolicy,
    timeline_in: f64,
    candidate_out: f64,
    beats: &[f64],
    available_source: f64,
) -> SnappedCut {
    if beats.is_empty() {
        return SnappedCut {
            timeline_out: candidate_out,
        };
    }

    let accept = |snapped_out: f64, min_span: f64| -> Option<f64> {
        let span = snapped_out - timeline_in;
        (span >= min_span && span <= available_source).then_some(snapped_out)
    };

    let timeline_out = match policy {
        BeatSnapPolicy::Off => candidate_out,
        BeatSnapPolicy::ToleranceSnap => {
            let snapped = snap_to_beat(candidate_out, beats, SNAP_TOLERANCE_SECONDS);
            accept(snapped, MIN_TOLERANCE_SPAN_SECONDS).unwrap_or(candidate_out)
        }
        BeatSnapPolicy::HardDualSnap => next_beat_at_or_after(candidate_out, beats)
            .and_then(|snapped| accept(snapped, MIN_DUAL_SNAP_SPAN_SECONDS))
            .unwrap_or(candidate_out),
    };

    SnappedCut { timeline_out }
}
