use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ingest::{ContentStats, MediaType};

pub type DocumentId = Uuid;

/// Descriptive metadata captured at upload time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
    #[serde(rename = "sizeKB")]
    pub size_kb: u64,
    pub word_count: usize,
    pub character_count: usize,
    pub uploaded_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub type_label: String,
}

impl DocumentMetadata {
    #[must_use]
    pub fn new(filename: String, media: MediaType, size_bytes: u64, content: &str) -> Self {
        let stats = ContentStats::of(content);
        Self {
            filename,
            mime_type: media.mime().to_string(),
            size_bytes,
            size_kb: (size_bytes + 512) / 1024,
            word_count: stats.word_count,
            character_count: stats.character_count,
            uploaded_at: Utc::now(),
            type_label: media.label().to_string(),
        }
    }
}

/// An uploaded document after extraction and preprocessing. Immutable once
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    #[must_use]
    pub fn new(content: String, metadata: DocumentMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            metadata,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.filename
    }
}
