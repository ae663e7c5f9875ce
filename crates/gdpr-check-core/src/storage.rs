use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Document, DocumentId};
use crate::report::{Report, ReportId};
use crate::Result;

/// Keyed store for uploaded documents. Each id is written once.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(&self, document: Document) -> Result<()>;

    async fn get(&self, id: DocumentId) -> Result<Option<Document>>;

    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Keyed store for reports.
///
/// `put` replaces the whole record, so a reader sees either the previous or
/// the new record, never a mix.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn put(&self, report: Report) -> Result<()>;

    async fn get(&self, id: ReportId) -> Result<Option<Report>>;

    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<DocumentId, Document>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put(&self, document: Document) -> Result<()> {
        self.documents.write().await.insert(document.id, document);
        Ok(())
    }

    async fn get(&self, id: DocumentId) -> Result<Option<Document>> {
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.documents.read().await.len())
    }
}

#[derive(Default)]
pub struct MemoryReportStore {
    reports: RwLock<HashMap<ReportId, Report>>,
}

impl MemoryReportStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn put(&self, report: Report) -> Result<()> {
        self.reports.write().await.insert(report.id, report);
        Ok(())
    }

    async fn get(&self, id: ReportId) -> Result<Option<Report>> {
        Ok(self.reports.read().await.get(&id).cloned())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.reports.read().await.len())
    }
}
