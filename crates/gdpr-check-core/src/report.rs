use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{AnalysisResult, ImprovementSuggestions};
use crate::document::DocumentId;

pub type ReportId = Uuid;

/// Lifecycle of a report. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReportState {
    Processing,
    Completed {
        analysis: AnalysisResult,
        improvements: ImprovementSuggestions,
        #[serde(rename = "completedAt")]
        completed_at: DateTime<Utc>,
    },
    Failed {
        error: String,
    },
}

impl ReportState {
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }

    pub const fn status(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    #[serde(rename = "documentId")]
    pub document_id: DocumentId,
    #[serde(rename = "documentName")]
    pub document_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: ReportState,
}

impl Report {
    /// A fresh report in the `processing` state.
    #[must_use]
    pub fn processing(document_id: DocumentId, document_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            document_name: document_name.into(),
            created_at: Utc::now(),
            state: ReportState::Processing,
        }
    }

    #[must_use]
    pub fn complete(self, analysis: AnalysisResult, improvements: ImprovementSuggestions) -> Self {
        Self {
            state: ReportState::Completed {
                analysis,
                improvements,
                completed_at: Utc::now(),
            },
            ..self
        }
    }

    #[must_use]
    pub fn fail(self, error: impl Into<String>) -> Self {
        Self {
            state: ReportState::Failed {
                error: error.into(),
            },
            ..self
        }
    }

    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub const fn analysis(&self) -> Option<&AnalysisResult> {
        match &self.state {
            ReportState::Completed { analysis, .. } => Some(analysis),
            _ => None,
        }
    }

    pub const fn improvements(&self) -> Option<&ImprovementSuggestions> {
        match &self.state {
            ReportState::Completed { improvements, .. } => Some(improvements),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ReportState::Failed { error } => Some(error),
            _ => None,
        }
    }
}
