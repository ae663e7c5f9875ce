use async_trait::async_trait;
use thiserror::Error;

use super::types::{AnalysisResult, ImprovementSuggestions};

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("IO_INTELLIGENCE_API_KEY is not configured")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Model API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Model API returned no choices")]
    EmptyResponse,
    #[error("{0}")]
    Other(String),
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// The external compliance-assessment capability.
///
/// Implementations turn model output into structured results themselves;
/// malformed output yields a degraded result rather than an error. Errors
/// are reserved for failing to obtain any output at all.
#[async_trait]
pub trait ComplianceAnalyzer: Send + Sync {
    async fn assess_compliance(
        &self,
        text: &str,
        document_name: &str,
    ) -> AnalyzerResult<AnalysisResult>;

    async fn suggest_improvements(
        &self,
        analysis: &AnalysisResult,
    ) -> AnalyzerResult<ImprovementSuggestions>;

    async fn list_models(&self) -> AnalyzerResult<Vec<String>>;

    fn default_model(&self) -> &str;
}
