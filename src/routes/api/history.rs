use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{
        dao::{PageParams, PaginatedResponse},
        entities::history,
    },
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, history_service::HistoryView},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecordViewRequest {
    pub post_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ClearedHistory {
    pub removed: u64,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/history",
            get(list_history).post(record_view).delete(clear_history),
        )
        .route("/history/{id}", delete(delete_entry))
        .with_state(state)
}

async fn list_history(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Query(params): Query<PageParams>,
) -> ApiResult<PaginatedResponse<HistoryView>> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.history().list(claims.user_id()?, params).await?)
}

async fn record_view(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<RecordViewRequest>,
) -> ApiResult<history::Model> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.history().record(claims.user_id()?, body.post_id).await?)
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let services = ServiceContext::from_state(&state);
    services.history().delete_entry(claims.user_id()?, id).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Riwayat dihapus", ())
}

async fn clear_history(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
) -> ApiResult<ClearedHistory> {
    let services = ServiceContext::from_state(&state);
    let removed = services.history().clear(claims.user_id()?).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Riwayat dibersihkan", ClearedHistory { removed })
}
