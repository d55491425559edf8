use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    db::{
        dao::{PageParams, PaginatedResponse},
        entities::bookmark,
    },
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, bookmark_service::BookmarkView},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct BookmarkRequest {
    pub post_id: Uuid,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/bookmarks", get(list_bookmarks).post(add_bookmark))
        .route("/bookmarks/{post_id}", delete(remove_bookmark))
        .with_state(state)
}

async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Query(params): Query<PageParams>,
) -> ApiResult<PaginatedResponse<BookmarkView>> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.bookmark().list(claims.user_id()?, params).await?)
}

async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<BookmarkRequest>,
) -> ApiResult<bookmark::Model> {
    let services = ServiceContext::from_state(&state);
    let created = services.bookmark().add(claims.user_id()?, body.post_id).await?;
    JsonApiResponse::created("Postingan ditambahkan ke bookmark", created)
}

async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(post_id): Path<Uuid>,
) -> ApiResult<()> {
    let services = ServiceContext::from_state(&state);
    services.bookmark().remove(claims.user_id()?, post_id).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Bookmark dihapus", ())
}
