use async_trait::async_trait;
use thiserror::Error;

use crate::document::DocumentId;
use crate::ingest::{MediaType, DEFAULT_MAX_UPLOAD_BYTES};
use crate::report::{Report, ReportId};
use crate::wire::{AnalyzeResponse, ErrorBody, HealthResponse, ModelsResponse, UploadResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid file type: {0}. Only PDF, DOC, DOCX, and TXT files are allowed")]
    UnsupportedType(String),
    #[error("File too large ({size} bytes). File size must be less than {}MB", limit / (1024 * 1024))]
    FileTooLarge { size: usize, limit: usize },
    #[error("Cannot connect to server. Please check if the server is running. ({0})")]
    Network(String),
    #[error("Request timed out. Please try again.")]
    Timeout,
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("{0}")]
    Rejected(String),
    #[error("Unexpected response from server: {0}")]
    Decode(String),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Builds the error for a non-success HTTP status, preferring the
    /// server's own message for client errors.
    pub fn from_status(status: u16, body: Option<ErrorBody>) -> Self {
        let message = match status {
            413 => "File too large. Please use a smaller file.".to_string(),
            429 => "Too many requests. Please wait a moment and try again.".to_string(),
            s if s >= 500 => "Server error. Please try again later.".to_string(),
            _ => body
                .map(|b| {
                    if b.message.is_empty() {
                        b.error
                    } else {
                        format!("{}: {}", b.error, b.message)
                    }
                })
                .unwrap_or_else(|| format!("Request failed with status {status}")),
        };
        Self::Http { status, message }
    }

    /// Network failures, timeouts and 5xx responses may succeed when retried.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() || e.is_builder() {
            Self::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::from_status(status.as_u16(), None)
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Checks a file locally before it is sent: the extension must map to a
/// supported media type and the size must be within the upload limit.
pub fn check_upload(filename: &str, size: usize) -> ClientResult<MediaType> {
    let media = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(MediaType::from_extension)
        .ok_or_else(|| ClientError::UnsupportedType(filename.to_string()))?;

    if size > DEFAULT_MAX_UPLOAD_BYTES {
        return Err(ClientError::FileTooLarge {
            size,
            limit: DEFAULT_MAX_UPLOAD_BYTES,
        });
    }

    Ok(media)
}

/// Client side of the compliance checker HTTP API.
#[async_trait]
pub trait ComplianceApi: Send + Sync {
    async fn health(&self) -> ClientResult<HealthResponse>;

    async fn upload(&self, filename: &str, data: Vec<u8>) -> ClientResult<UploadResponse>;

    async fn start_analysis(&self, document_id: DocumentId) -> ClientResult<AnalyzeResponse>;

    async fn get_report(&self, report_id: ReportId) -> ClientResult<Report>;

    async fn models(&self) -> ClientResult<ModelsResponse>;
}
