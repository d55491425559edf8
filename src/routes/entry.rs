use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    middleware::{attach_claims, catch_panic_layer, json_error_middleware},
    state::AppState,
};

use super::api;

pub const API_PREFIX: &str = "/api";

pub fn router(state: Arc<AppState>) -> Router {
    let storage = &state.config.storage;
    Router::new()
        .nest(API_PREFIX, api::router(state.clone()))
        .nest_service(
            storage.public_base_url.as_str(),
            ServeDir::new(storage.upload_dir.as_str()),
        )
}

/// Router plus the layers every request goes through.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(router(state.clone()))
        .layer(middleware::from_fn_with_state(state, attach_claims))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
}
