use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use gdpr_check_core::wire::{AnalyzeRequest, AnalyzeResponse};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze_document))
}

async fn analyze_document(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let raw_id = request
        .document_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(ApiError::MissingDocumentId)?;
    let document_id = Uuid::parse_str(raw_id.trim()).map_err(|_| ApiError::DocumentNotFound)?;

    let report_id = state.orchestrator.start_analysis(document_id).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        report_id,
        status: "processing".into(),
        message: "Analysis started. Use the report ID to check progress.".into(),
    }))
}
