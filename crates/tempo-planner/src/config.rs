//! Planner configuration.

use std::time::Duration;

use crate::beat::BeatSnapPolicy;

/// Whether the quality-filter stage consults the oracle or passes
/// everything through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityFilterMode {
    /// Ask the judgment service per clip.
    #[default]
    Oracle,
    /// Include every clip without consulting the oracle.
    AlwaysInclude,
}

/// Planner configuration.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum concurrent judgment-service calls. Kept low to respect
    /// external rate limits.
    pub max_concurrent_calls: usize,
    /// Maximum retries per judgment call (not including the initial attempt).
    pub max_retries: u32,
    /// Base delay for exponential backoff (doubles each attempt).
    pub retry_base_delay: Duration,
    /// Quality-filter stage behavior.
    pub quality_filter: QualityFilterMode,
    /// Beat-alignment policy for B-roll cuts.
    pub beat_snap: BeatSnapPolicy,
    /// Music volume under dialogue (0.0 to 1.0).
    pub duck_volume: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_calls: 2,
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            quality_filter: QualityFilterMode::default(),
            beat_snap: BeatSnapPolicy::default(),
            duck_volume: 0.3,
        }
    }
}

impl PlannerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_concurrent_calls: std::env::var("PLANNER_MAX_CONCURRENT_CALLS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrent_calls),
            max_retries: std::env::var("PLANNER_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
            retry_base_delay: std::env::var("PLANNER_RETRY_BASE_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_base_delay),
            quality_filter: match std::env::var("PLANNER_QUALITY_FILTER").as_deref() {
                Ok("off") | Ok("always_include") => QualityFilterMode::AlwaysInclude,
                _ => QualityFilterMode::Oracle,
            },
            beat_snap: match std::env::var("PLANNER_BEAT_SNAP").as_deref() {
                Ok("tolerance") => BeatSnapPolicy::ToleranceSnap,
                Ok("off") => BeatSnapPolicy::Off,
                _ => BeatSnapPolicy::HardDualSnap,
            },
            duck_volume: std::env::var("PLANNER_DUCK_VOLUME")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.duck_volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.max_concurrent_calls, 2);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_base_delay, Duration::from_secs(1));
        assert_eq!(config.quality_filter, QualityFilterMode::Oracle);
        assert_eq!(config.beat_snap, BeatSnapPolicy::HardDualSnap);
        assert!((config.duck_volume - 0.3).abs() < 1e-9);
    }
}
