//! Assembly input - everything the planner needs for one run.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::manifest::AssetManifest;
use crate::style::StyleProfile;

/// Input for the edit planner.
///
/// Contains the asset manifest and optional style profile guiding assembly
/// decisions. A missing style profile means the documented defaults apply.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssemblyInput {
    pub manifest: AssetManifest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_profile: Option<StyleProfile>,
    #[serde(default = "default_frame_rate")]
    pub target_frame_rate: f64,
}

fn default_frame_rate() -> f64 {
    60.0
}

impl AssemblyInput {
    /// Create an input with default frame rate and no style profile.
    pub fn new(manifest: AssetManifest) -> Self {
        Self {
            manifest,
            style_profile: None,
            target_frame_rate: default_frame_rate(),
        }
    }

    pub fn with_style(mut self, style: StyleProfile) -> Self {
        self.style_profile = Some(style);
        self
    }
}
