//! Judgment service for the Tempo edit planner.
//!
//! The planner needs two kinds of judgment calls per clip: classify it as
//! dialogue or B-roll, and choose cut-in/cut-out points for a target
//! duration. Both go through the [`ClipJudge`] trait so the decision-maker
//! can be a remote service, a rule engine, or a test double.
//!
//! Results are always typed - a tagged [`Classification`] variant, never
//! free text to be pattern-matched.

pub mod error;
pub mod judge;
pub mod remote;
pub mod rules;
pub mod types;

pub use error::{OracleError, OracleResult};
pub use judge::ClipJudge;
pub use remote::{OracleConfig, RemoteJudge};
pub use rules::RuleBasedJudge;
pub use types::{
    Classification, ClassificationResult, CutPointDecision, QualityDecision, QualityVerdict,
};
