mod analyze;
mod health;
mod models;
mod reports;
mod stats;
mod upload;

use axum::{
    extract::{DefaultBodyLimit, OriginalUri},
    Router,
};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(body_limit: usize) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(upload::router().layer(DefaultBodyLimit::max(body_limit)))
        .merge(analyze::router())
        .merge(reports::router())
        .merge(models::router())
        .merge(stats::router())
}

pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}
