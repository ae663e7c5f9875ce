use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use gdpr_check_core::wire::{StatsResponse, SystemStats};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = SystemStats {
        documents_processed: state.orchestrator.document_count().await?,
        reports_generated: state.orchestrator.report_count().await?,
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: Utc::now(),
    };

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
