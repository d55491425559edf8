use std::sync::Arc;

use axum::{Router, extract::State, routing::get};

use crate::{
    error::AppError,
    response::{ApiResult, JsonApiResponse},
    routes::route_list::{RouteInfo, routes},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/routes", get(list_routes))
        .with_state(state)
}

async fn health() -> ApiResult<serde_json::Value> {
    JsonApiResponse::ok(serde_json::json!({ "ok": true }))
}

async fn list_routes(State(state): State<Arc<AppState>>) -> ApiResult<&'static [RouteInfo]> {
    if !cfg!(debug_assertions) && !state.config.general.enable_docs_in_release {
        return Err(AppError::not_found("Halaman tidak ditemukan"));
    }
    JsonApiResponse::ok(routes())
}
