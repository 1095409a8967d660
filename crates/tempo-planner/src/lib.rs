//! Beat-synchronized edit planning.
//!
//! This crate turns an annotated asset manifest and an optional style
//! profile into a [`tempo_models::TimelineBlueprint`]:
//!
//! 1. The chunker partitions the music timeline into segments and budgets
//!    clips per segment.
//! 2. The assembler selects clips per segment, asks the judgment service
//!    for classifications and cut points (fanned out through the bounded
//!    invoker), and appends decisions along a continuously advancing
//!    timeline cursor.
//! 3. The ducking segmenter slices each music bed into full-volume and
//!    ducked sub-segments around the resulting dialogue windows.
//!
//! The planner is a pure computation over in-memory structures; persistence
//! of manifests and blueprints lives in [`checkpoint`].

pub mod assembler;
pub mod beat;
pub mod checkpoint;
pub mod chunker;
pub mod config;
pub mod ducking;
pub mod error;
pub mod invoker;

pub use assembler::EditPlanner;
pub use beat::BeatSnapPolicy;
pub use checkpoint::CheckpointStore;
pub use chunker::{compute_chunk_boundaries, compute_segment_budget, ChunkContext, SegmentBudget};
pub use config::{PlannerConfig, QualityFilterMode};
pub use ducking::{build_ducked_track, duck_blueprint};
pub use error::{PlannerError, PlannerResult};
pub use invoker::{Invoker, RetryPolicy};
