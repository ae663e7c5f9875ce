use std::sync::Arc;
use std::time::Instant;

use gdpr_check_core::{
    ComplianceAnalyzer, DocumentStore, IngestPipeline, MemoryDocumentStore, MemoryReportStore,
    Orchestrator,
};

use crate::config::ServerConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub ingest: Arc<IngestPipeline>,
    pub config: Arc<ServerConfig>,
    pub started_at: Instant,
}

impl AppState {
    /// State backed by in-memory stores.
    pub fn new(config: ServerConfig, analyzer: Arc<dyn ComplianceAnalyzer>) -> Self {
        let documents: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let ingest = IngestPipeline::new(Arc::clone(&documents))
            .with_max_upload_bytes(config.max_upload_bytes);
        let orchestrator =
            Orchestrator::new(documents, Arc::new(MemoryReportStore::new()), analyzer);

        Self {
            orchestrator,
            ingest: Arc::new(ingest),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}
