use axum::{extract::State, routing::get, Json, Router};
use gdpr_check_core::wire::ModelsResponse;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/models", get(list_models))
}

async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, ApiError> {
    let analyzer = state.orchestrator.analyzer();
    let models = analyzer
        .list_models()
        .await
        .map_err(|e| ApiError::ModelsUnavailable(e.to_string()))?;

    Ok(Json(ModelsResponse {
        success: true,
        models,
        default_model: analyzer.default_model().to_string(),
    }))
}
