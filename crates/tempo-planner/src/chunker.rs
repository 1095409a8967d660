//! Music-timeline chunking and per-segment clip budgeting.

use tempo_models::{BeatInfo, ChopPoint, ClipForAssembly, StyleProfile};

/// Minimum spacing between consecutive chunk boundaries. Chop points that
/// collide with 0.0 or the track end are absorbed.
const BOUNDARY_EPSILON: f64 = 1e-6;

/// Partition the music duration into contiguous segment boundaries.
///
/// Returns strictly increasing timestamps starting at 0.0 and ending at
/// `total_duration` (length = segment count + 1). When the style carries a
/// `beats_per_cut` override and a beat grid exists, boundaries fall on
/// every Nth beat; otherwise they follow the detected chop points. With no
/// chop points and no override the result is a single full-length segment.
pub fn compute_chunk_boundaries(
    beat_grid: &[BeatInfo],
    chop_points: &[ChopPoint],
    total_duration: f64,
    style: Option<&StyleProfile>,
) -> Vec<f64> {
    let beats_per_cut = style.and_then(|s| s.beats_per_cut).filter(|n| *n > 0);

    let inner: Vec<f64> = match beats_per_cut {
        Some(n) if !beat_grid.is_empty() => beat_grid
            .iter()
            .enumerate()
            .filter(|(i, _)| *i > 0 && *i % n == 0)
            .map(|(_, b)| b.time_seconds)
            .collect(),
        _ => chop_points.iter().map(|cp| cp.time_seconds).collect(),
    };

    let mut boundaries = vec![0.0];
    for t in inner {
        if t > BOUNDARY_EPSILON
            && t < total_duration - BOUNDARY_EPSILON
            && t > boundaries[boundaries.len() - 1] + BOUNDARY_EPSILON
        {
            boundaries.push(t);
        }
    }
    boundaries.push(total_duration);
    boundaries
}

/// Clip allocation for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBudget {
    pub clip_count: usize,
    pub avg_duration_seconds: f64,
}

/// Decide how many clips a segment gets and their target average duration.
///
/// The count derived from the pacing target is capped so the remaining clip
/// pool spreads evenly across the remaining segments instead of being
/// front-loaded. The cap never drops below one: when fewer clips remain
/// than segments, early segments still consume one clip each and the pool
/// runs dry before the last segments, rather than stranding clips on a
/// zero allocation.
pub fn compute_segment_budget(
    segment_duration: f64,
    remaining_clips: usize,
    remaining_segments: usize,
    style: Option<&StyleProfile>,
) -> SegmentBudget {
    if remaining_clips == 0 {
        return SegmentBudget {
            clip_count: 0,
            avg_duration_seconds: segment_duration,
        };
    }

    let target_cut_duration = StyleProfile::target_clip_duration(style);
    let mut clip_count = ((segment_duration / target_cut_duration).floor() as usize).max(1);

    if remaining_segments > 0 {
        let even_share = (remaining_clips / remaining_segments).max(1);
        clip_count = clip_count.min(even_share);
    }
    clip_count = clip_count.min(remaining_clips);

    let avg_duration_seconds = if clip_count > 0 {
        segment_duration / clip_count as f64
    } else {
        segment_duration
    };

    SegmentBudget {
        clip_count,
        avg_duration_seconds,
    }
}

/// Working context for one music chunk being assembled.
#[derive(Debug, Clone)]
pub struct ChunkContext {
    pub chunk_index: usize,
    pub chunk_start_seconds: f64,
    pub chunk_end_seconds: f64,
    pub chunk_duration_seconds: f64,
    /// Clips assigned to this chunk, in manifest order.
    pub clips: Vec<ClipForAssembly>,
    /// Index of the last clip consumed by the previous chunk, if any.
    pub previous_chunk_end_clip_index: Option<usize>,
}

impl ChunkContext {
    /// Beats from the grid that fall inside this chunk's bounds.
    pub fn beats_within(&self, beat_grid: &[BeatInfo]) -> Vec<f64> {
        beat_grid
            .iter()
            .map(|b| b.time_seconds)
            .filter(|t| *t >= self.chunk_start_seconds && *t < self.chunk_end_seconds)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beats(times: &[f64]) -> Vec<BeatInfo> {
        times
            .iter()
            .map(|t| BeatInfo {
                time_seconds: *t,
                strength: 1.0,
            })
            .collect()
    }

    fn chops(times: &[f64]) -> Vec<ChopPoint> {
        times
            .iter()
            .map(|t| ChopPoint {
                time_seconds: *t,
                strength: 1.0,
                is_downbeat: false,
            })
            .collect()
    }

    #[test]
    fn test_phrase_mode_boundaries() {
        let boundaries = compute_chunk_boundaries(&[], &chops(&[4.0, 7.0]), 10.0, None);
        assert_eq!(boundaries, vec![0.0, 4.0, 7.0, 10.0]);
    }

    #[test]
    fn test_phrase_mode_length_is_chop_count_plus_two() {
        let chop_times = [2.0, 4.0, 6.0, 8.0];
        let boundaries = compute_chunk_boundaries(&[], &chops(&chop_times), 10.0, None);
        assert_eq!(boundaries.len(), chop_times.len() + 2);
    }

    #[test]
    fn test_empty_chops_yield_single_segment() {
        let boundaries = compute_chunk_boundaries(&[], &[], 12.0, None);
        assert_eq!(boundaries, vec![0.0, 12.0]);
    }

    #[test]
    fn test_beats_per_cut_mode() {
        let grid = beats(&[0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0]);
        let mut style = StyleProfile::default();
        style.beats_per_cut = Some(4);

        let boundaries = compute_chunk_boundaries(&grid, &[], 6.0, Some(&style));
        // Every 4th beat: indices 4 and 8 -> 2.0s and 4.0s.
        assert_eq!(boundaries, vec![0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_boundaries_are_strictly_increasing() {
        // Chop points at 0.0 and at the track end must be absorbed.
        let boundaries = compute_chunk_boundaries(&[], &chops(&[0.0, 3.0, 3.0, 10.0]), 10.0, None);
        assert_eq!(boundaries, vec![0.0, 3.0, 10.0]);
        for pair in boundaries.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_determinism() {
        let grid = beats(&[0.0, 1.0, 2.0, 3.0]);
        let cps = chops(&[2.5, 5.0]);
        let a = compute_chunk_boundaries(&grid, &cps, 8.0, None);
        let b = compute_chunk_boundaries(&grid, &cps, 8.0, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_budget_uses_default_target() {
        let budget = compute_segment_budget(9.0, 10, 2, None);
        // 9s at the 3s default target -> 3 clips, capped at 10/2 = 5.
        assert_eq!(budget.clip_count, 3);
        assert!((budget.avg_duration_seconds - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_even_exhaustion_cap() {
        // 12s segment wants 4 clips, but only 4 clips across 4 segments
        // remain: the cap keeps it to one per segment.
        let budget = compute_segment_budget(12.0, 4, 4, None);
        assert_eq!(budget.clip_count, 1);
        assert!((budget.avg_duration_seconds - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_never_exceeds_remaining() {
        let budget = compute_segment_budget(30.0, 2, 1, None);
        assert_eq!(budget.clip_count, 2);
    }

    #[test]
    fn test_budget_zero_remaining_skips_segment() {
        let budget = compute_segment_budget(5.0, 0, 3, None);
        assert_eq!(budget.clip_count, 0);
        assert!((budget.avg_duration_seconds - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_sparse_pool_still_allocates_one() {
        // Two clips over five segments: floor is 0, but clips remain so the
        // segment still receives one.
        let budget = compute_segment_budget(6.0, 2, 5, None);
        assert_eq!(budget.clip_count, 1);
    }
}
