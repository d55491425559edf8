use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    db::dao::ClearReport,
    middleware::{AdminGuard, SuperAdminGuard},
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, admin_service::DashboardStats},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin/stats", get(stats))
        .route("/admin/clear-database", post(clear_database))
        .with_state(state)
}

async fn stats(State(state): State<Arc<AppState>>, _guard: AdminGuard) -> ApiResult<DashboardStats> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.admin().stats().await?)
}

async fn clear_database(
    State(state): State<Arc<AppState>>,
    guard: SuperAdminGuard,
) -> ApiResult<ClearReport> {
    tracing::warn!(actor = %guard.claims.sub, "clear-database requested");
    let services = ServiceContext::from_state(&state);
    let report = services.admin().clear_database().await?;
    JsonApiResponse::with_status(StatusCode::OK, "Database berhasil dibersihkan", report)
}
