use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gdpr_check_core::{DocumentId, Report, ReportId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Upload,
    Analyzing,
    Report,
}

/// Progress of the last `check`, kept between runs so `resume` can pick it up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub current_step: Step,
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    #[serde(default)]
    pub report_id: Option<ReportId>,
    #[serde(default)]
    pub report_data: Option<Report>,
}

impl SavedState {
    pub fn uploaded(document_id: DocumentId) -> Self {
        Self {
            current_step: Step::Analyzing,
            document_id: Some(document_id),
            ..Self::default()
        }
    }

    pub fn finish(&mut self, report: Report) {
        self.current_step = Step::Report;
        self.report_id = Some(report.id);
        self.report_data = Some(report);
    }
}

/// JSON file holding a `SavedState`.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<data dir>/gdpr-check/state.json`
    pub fn default_location() -> Result<Self> {
        let dir = dirs::data_dir().context("Could not determine a data directory; pass --state")?;
        Ok(Self::new(dir.join("gdpr-check").join("state.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<SavedState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let state = serde_json::from_str(&raw)
            .with_context(|| format!("Saved state at {} is corrupt", self.path.display()))?;
        Ok(Some(state))
    }

    pub fn save(&self, state: &SavedState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), step = ?state.current_step, "State saved");
        Ok(())
    }

    /// Returns whether there was anything to remove.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        Ok(true)
    }
}
