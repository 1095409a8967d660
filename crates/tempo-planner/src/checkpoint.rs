//! Durable checkpoints for plan jobs.
//!
//! Each job gets a directory under the store root holding the input
//! manifest, the job record, and (once planning succeeds) the blueprint,
//! all as pretty-printed JSON. A resumed worker reloads whatever is
//! present and continues from there.

use std::path::{Path, PathBuf};

use tracing::debug;

use tempo_models::{AssetManifest, PlanJob, TimelineBlueprint};

use crate::error::PlannerResult;

const MANIFEST_FILE: &str = "manifest.json";
const BLUEPRINT_FILE: &str = "blueprint.json";
const JOB_FILE: &str = "job.json";

/// Filesystem-backed checkpoint store.
pub struct CheckpointStore {
    root: PathBuf,
}

impl CheckpointStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn job_dir(&self, job_id: &str) -> PathBuf {
        self.root.join(job_id)
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> PlannerResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "wrote checkpoint");
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> PlannerResult<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    pub fn save_manifest(&self, job_id: &str, manifest: &AssetManifest) -> PlannerResult<()> {
        self.write_json(&self.job_dir(job_id).join(MANIFEST_FILE), manifest)
    }

    pub fn load_manifest(&self, job_id: &str) -> PlannerResult<Option<AssetManifest>> {
        self.read_json(&self.job_dir(job_id).join(MANIFEST_FILE))
    }

    pub fn save_blueprint(&self, job_id: &str, blueprint: &TimelineBlueprint) -> PlannerResult<()> {
        self.write_json(&self.job_dir(job_id).join(BLUEPRINT_FILE), blueprint)
    }

    pub fn load_blueprint(&self, job_id: &str) -> PlannerResult<Option<TimelineBlueprint>> {
        self.read_json(&self.job_dir(job_id).join(BLUEPRINT_FILE))
    }

    pub fn save_job(&self, job: &PlanJob) -> PlannerResult<()> {
        self.write_json(&self.job_dir(&job.job_id).join(JOB_FILE), job)
    }

    pub fn load_job(&self, job_id: &str) -> PlannerResult<Option<PlanJob>> {
        self.read_json(&self.job_dir(job_id).join(JOB_FILE))
    }
}
