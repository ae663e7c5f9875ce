pub mod analysis;
pub mod client;
pub mod document;
pub mod error;
pub mod ingest;
pub mod orchestrator;
pub mod report;
pub mod storage;
pub mod wire;

pub use analysis::{
    AnalysisResult, AnalyzerError, ComplianceAnalyzer, ComplianceLevel, ImprovementSuggestions,
    LlmClient, LlmConfig,
};
pub use document::{Document, DocumentId, DocumentMetadata};
pub use error::{Error, Result};
pub use ingest::{ContentLimits, IngestError, IngestPipeline, MediaType, Upload};
pub use orchestrator::{AnalysisTask, Orchestrator};
pub use report::{Report, ReportId, ReportState};
pub use storage::{DocumentStore, MemoryDocumentStore, MemoryReportStore, ReportStore};
