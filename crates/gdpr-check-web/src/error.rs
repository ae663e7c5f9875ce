use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gdpr_check_core::ingest::{ExtractError, IngestError};
use gdpr_check_core::wire::ErrorBody;
use thiserror::Error;

/// Errors returned by API handlers, rendered as `{error, message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file uploaded")]
    NoFile,

    #[error("File too large")]
    FileTooLarge { limit_mb: usize },

    #[error("Invalid file type")]
    InvalidFileType,

    #[error("Invalid document content: {0}")]
    InvalidContent(String),

    #[error("Document processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Missing document ID")]
    MissingDocumentId,

    #[error("Document not found")]
    DocumentNotFound,

    #[error("Missing report ID")]
    MissingReportId,

    #[error("Report not found")]
    ReportNotFound,

    #[error("Failed to fetch models: {0}")]
    ModelsUnavailable(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NoFile
            | Self::FileTooLarge { .. }
            | Self::InvalidFileType
            | Self::InvalidContent(_)
            | Self::MissingDocumentId
            | Self::MissingReportId
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::DocumentNotFound | Self::ReportNotFound | Self::RouteNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::ProcessingFailed(_) | Self::ModelsUnavailable(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::NoFile => ErrorBody::new("No file uploaded", "Please select a document to upload"),
            Self::FileTooLarge { limit_mb } => ErrorBody::new(
                "File too large",
                format!("File size must be less than {limit_mb}MB"),
            ),
            Self::InvalidFileType => ErrorBody::new(
                "Invalid file type",
                "Only PDF, DOC, DOCX, and TXT files are allowed",
            ),
            Self::InvalidContent(message) => ErrorBody::new("Invalid document content", message),
            Self::ProcessingFailed(message) => ErrorBody::new("Document processing failed", message),
            Self::MissingDocumentId => ErrorBody::new(
                "Missing document ID",
                "Please provide a document ID for analysis",
            ),
            Self::DocumentNotFound => ErrorBody::new(
                "Document not found",
                "The specified document could not be found",
            ),
            Self::MissingReportId => ErrorBody::new("Missing report ID", "Please provide a report ID"),
            Self::ReportNotFound => ErrorBody::new(
                "Report not found",
                "The specified report could not be found",
            ),
            Self::ModelsUnavailable(message) => ErrorBody::new("Failed to fetch models", message),
            Self::BadRequest(message) => ErrorBody::new("Invalid request", message),
            Self::RouteNotFound(uri) => ErrorBody::new(
                "Route not found",
                format!("The requested route {uri} does not exist."),
            ),
            Self::Internal(_) => {
                ErrorBody::new("Internal Server Error", "Something went wrong on the server")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::FileTooLarge { limit, .. } => Self::FileTooLarge {
                limit_mb: limit / (1024 * 1024),
            },
            IngestError::Extract(ExtractError::UnsupportedFormat(_)) => Self::InvalidFileType,
            IngestError::Extract(e @ ExtractError::ExtractionFailed(_)) => {
                Self::ProcessingFailed(e.to_string())
            }
            IngestError::Validation(e) => Self::InvalidContent(e.to_string()),
            IngestError::Storage(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<gdpr_check_core::Error> for ApiError {
    fn from(err: gdpr_check_core::Error) -> Self {
        match err {
            gdpr_check_core::Error::DocumentNotFound(_) => Self::DocumentNotFound,
            gdpr_check_core::Error::ReportNotFound(_) => Self::ReportNotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use gdpr_check_core::ingest::ValidationError;

    use super::*;

    #[test]
    fn test_ingest_errors_map_to_statuses() {
        let too_large: ApiError = IngestError::FileTooLarge {
            limit: 10 * 1024 * 1024,
            actual: 11 * 1024 * 1024,
        }
        .into();
        assert_eq!(too_large.status(), StatusCode::BAD_REQUEST);
        assert_eq!(too_large.body().message, "File size must be less than 10MB");

        let wrong_type: ApiError =
            IngestError::Extract(ExtractError::UnsupportedFormat("image/png".into())).into();
        assert_eq!(wrong_type.status(), StatusCode::BAD_REQUEST);
        assert_eq!(wrong_type.body().error, "Invalid file type");

        let short: ApiError =
            IngestError::Validation(ValidationError::TooShort { min: 100, actual: 3 }).into();
        assert_eq!(short.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            short.body().message,
            "Document too short for meaningful analysis (minimum 100 characters)"
        );

        let broken: ApiError =
            IngestError::Extract(ExtractError::ExtractionFailed("bad xref".into())).into();
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(broken.body().error, "Document processing failed");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let body = ApiError::Internal("lock poisoned".into()).body();

        assert!(!body.message.contains("lock poisoned"));
    }
}
