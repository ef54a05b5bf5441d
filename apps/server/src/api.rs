use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, routing::get, Router};
use tcsi_core::TEXT_CONTENT_TYPE;
use tower_http::trace::TraceLayer;

use crate::{error::ApiResult, main_lib::AppState};

pub const METRICS_PATH: &str = "/metrics";

pub async fn healthz() -> &'static str {
    "ok"
}

/// One scrape: run every collector and render the text exposition.
///
/// Upstream failures only shrink the output; the response is still 200.
async fn metrics(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let body = state.registry.gather_text().await?;
    Ok(([(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)], body))
}

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(METRICS_PATH, get(metrics))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
