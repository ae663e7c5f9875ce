use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::extractor::{CompositeExtractor, ExtractError, Extractor};
use super::media::MediaType;
use super::normalizer::{preprocess, ContentLimits, ValidationError};
use crate::document::{Document, DocumentMetadata};
use crate::storage::DocumentStore;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("File size must be less than {}MB", limit / (1024 * 1024))]
    FileTooLarge { limit: usize, actual: usize },
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] crate::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// An upload as received from the caller.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub declared_mime: String,
    pub data: Vec<u8>,
}

impl Upload {
    #[must_use]
    pub fn new(filename: impl Into<String>, declared_mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            declared_mime: declared_mime.into(),
            data,
        }
    }
}

/// Turns uploads into stored documents: extract, validate, preprocess,
/// validate again, store.
pub struct IngestPipeline {
    extractor: Box<dyn Extractor>,
    limits: ContentLimits,
    max_upload_bytes: usize,
    store: Arc<dyn DocumentStore>,
}

impl IngestPipeline {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            extractor: Box::new(CompositeExtractor::default()),
            limits: ContentLimits::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            store,
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub const fn with_limits(mut self, limits: ContentLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub const fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub const fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub async fn ingest(&self, upload: Upload) -> IngestResult<Document> {
        if upload.data.len() > self.max_upload_bytes {
            return Err(IngestError::FileTooLarge {
                limit: self.max_upload_bytes,
                actual: upload.data.len(),
            });
        }

        let media = MediaType::from_mime(&upload.declared_mime)
            .ok_or_else(|| ExtractError::UnsupportedFormat(upload.declared_mime.clone()))?;

        let raw = self.extractor.extract_text(&upload.data, media).await?;
        self.limits.validate(&raw)?;

        let content = preprocess(&raw);
        self.limits.validate(&content)?;

        let metadata = DocumentMetadata::new(
            upload.filename,
            media,
            upload.data.len() as u64,
            &content,
        );
        let document = Document::new(content, metadata);

        debug!(
            document_id = %document.id,
            words = document.metadata.word_count,
            "Document ingested"
        );

        self.store.put(document.clone()).await?;
        Ok(document)
    }
}
