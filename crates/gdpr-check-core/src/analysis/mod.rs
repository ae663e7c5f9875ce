mod analyzer;
mod client;
mod config;
mod parse;
mod prompts;
mod types;

pub use analyzer::{AnalyzerError, AnalyzerResult, ComplianceAnalyzer};
pub use client::LlmClient;
pub(crate) use client::base_url;
pub use config::{CompletionParams, LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use parse::{outer_json_object, parse_analysis, parse_improvements, strip_code_fence};
pub use types::{
    AnalysisResult, AreaAssessment, AreaStatus, ComplianceLevel, DetailedAnalysis, Improvement,
    ImprovementSuggestions, Priority,
};
