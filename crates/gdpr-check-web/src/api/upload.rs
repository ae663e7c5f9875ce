use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use gdpr_check_core::ingest::{MediaType, Upload};
use gdpr_check_core::wire::UploadResponse;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the file.
const FILE_FIELD: &str = "document";

pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload_document))
}

async fn upload_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut multipart = multipart.map_err(|_| ApiError::NoFile)?;
    let upload = read_upload(&mut multipart, &state).await?;
    let filename = upload.filename.clone();

    let document = state.ingest.ingest(upload).await.map_err(|e| {
        warn!(%filename, error = %e, "Upload rejected");
        ApiError::from(e)
    })?;

    info!(
        document_id = %document.id,
        %filename,
        words = document.metadata.word_count,
        "Document uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            document_id: document.id,
            metadata: document.metadata,
            message: "Document uploaded and processed successfully".into(),
        }),
    ))
}

/// Pulls the `document` field out of the form. The declared type is checked
/// before the body is read.
async fn read_upload(multipart: &mut Multipart, state: &AppState) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, state))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("document").to_string();
        let declared_mime = match field.content_type() {
            Some(mime) => mime.to_string(),
            None => media_from_filename(&filename)
                .map(|m| m.mime().to_string())
                .unwrap_or_default(),
        };
        if MediaType::from_mime(&declared_mime).is_none() {
            return Err(ApiError::InvalidFileType);
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(&e, state))?;

        return Ok(Upload::new(filename, declared_mime, data.to_vec()));
    }

    Err(ApiError::NoFile)
}

fn media_from_filename(filename: &str) -> Option<MediaType> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(MediaType::from_extension)
}

fn multipart_error(err: &MultipartError, state: &AppState) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::FileTooLarge {
            limit_mb: state.config.max_upload_bytes / (1024 * 1024),
        }
    } else {
        ApiError::BadRequest(err.body_text())
    }
}
