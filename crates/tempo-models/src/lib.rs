//! Shared data models for the Tempo edit-planning pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Annotated asset manifests (speech, stability, and music-timing analyses)
//! - Clip projections used during assembly
//! - Style profiles extracted from reference edits
//! - Timeline blueprints (cut decisions and audio tracks)
//! - Plan job documents for checkpoint/resume

pub mod assembly;
pub mod blueprint;
pub mod clip;
pub mod job;
pub mod manifest;
pub mod style;

// Re-export common types
pub use assembly::AssemblyInput;
pub use blueprint::{
    AudioMixLevel, AudioSegment, AudioTrackInfo, ChunkDecisions, ClipType, CutDecision,
    TimelineBlueprint,
};
pub use clip::ClipForAssembly;
pub use job::{PlanJob, PlanJobStatus, PlanProgress};
pub use manifest::{
    AssetManifest, AudioAssetAnnotation, BeatInfo, ChopPoint, ManifestError, MetronomeAnalysis,
    OnsetInfo, SpeechAnalysis, SpeechRange, StabilityAnalysis, StabilityWindow, TranscriptSegment,
    VideoAssetAnnotation,
};
pub use style::{EditingRhythm, PacingProfile, StyleProfile};
