use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        dao::{PageParams, PaginatedResponse},
        entities::comment,
    },
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, comment_service::CommentView},
    state::AppState,
};

use super::validated;

#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    pub post_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    #[validate(length(min = 1, max = 2000, message = "Komentar harus 1 sampai 2000 karakter"))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Komentar harus 1 sampai 2000 karakter"))]
    pub content: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/comments", get(list_comments).post(create_comment))
        .route("/comments/{id}", put(update_comment).delete(delete_comment))
        .with_state(state)
}

async fn list_comments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
    Query(query): Query<CommentListQuery>,
) -> ApiResult<PaginatedResponse<CommentView>> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.comment().list(query.post_id, params).await?)
}

async fn create_comment(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<CreateCommentRequest>,
) -> ApiResult<comment::Model> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let created = services
        .comment()
        .create(&claims, body.post_id, &body.content)
        .await?;
    JsonApiResponse::created("Komentar berhasil ditambahkan", created)
}

async fn update_comment(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCommentRequest>,
) -> ApiResult<comment::Model> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.comment().update(&claims, id, &body.content).await?)
}

async fn delete_comment(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let services = ServiceContext::from_state(&state);
    services.comment().delete(&claims, id).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Komentar berhasil dihapus", ())
}
