use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use gdpr_check_core::wire::ReportResponse;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(missing_report_id))
        .route("/reports/", get(missing_report_id))
        .route("/reports/{id}", get(get_report))
}

async fn missing_report_id() -> ApiError {
    ApiError::MissingReportId
}

async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReportResponse>, ApiError> {
    // Ids are UUIDs; anything else cannot name a report
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::ReportNotFound)?;
    let report = state.orchestrator.get_report(id).await?;

    Ok(Json(ReportResponse {
        success: true,
        report,
    }))
}
