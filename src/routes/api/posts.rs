use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{dao::PageParams, dao::PaginatedResponse, entities::post},
    middleware::{EditorGuard, OptionalClaims},
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        post_service::{PostDetail, PostInput, PostQuery, PostSummary, PostType, PostUpdate},
    },
    state::AppState,
};

use super::{nullable, validated};

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    pub category: Option<String>,
    pub q: Option<String>,
    #[serde(default)]
    pub include_drafts: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Judul wajib diisi (maksimal 200 karakter)"))]
    pub title: String,
    #[validate(length(min = 1, message = "Konten wajib diisi"))]
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    #[validate(length(max = 500, message = "Ringkasan maksimal 500 karakter"))]
    pub excerpt: Option<String>,
    #[validate(url(message = "URL thumbnail tidak valid"))]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Judul wajib diisi (maksimal 200 karakter)"))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub excerpt: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub thumbnail_url: Option<Option<String>>,
    pub category_ids: Option<Vec<Uuid>>,
    pub publish: Option<bool>,
}

impl From<UpdatePostRequest> for PostUpdate {
    fn from(body: UpdatePostRequest) -> Self {
        Self {
            title: body.title,
            content: body.content,
            excerpt: body.excerpt,
            thumbnail_url: body.thumbnail_url,
            category_ids: body.category_ids,
            publish: body.publish,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        // GET takes the slug; PUT and DELETE take the id.
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .with_state(state)
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
    OptionalClaims(viewer): OptionalClaims,
    Query(params): Query<PageParams>,
    Query(query): Query<PostListQuery>,
) -> ApiResult<PaginatedResponse<PostSummary>> {
    let services = ServiceContext::from_state(&state);
    let page = services
        .post()
        .list(
            params,
            PostQuery {
                post_type: query.post_type,
                category_slug: query.category,
                q: query.q,
                include_drafts: query.include_drafts,
            },
            viewer.map(|claims| claims.role),
        )
        .await?;
    JsonApiResponse::ok(page)
}

async fn get_post(
    State(state): State<Arc<AppState>>,
    OptionalClaims(viewer): OptionalClaims,
    Path(slug): Path<String>,
) -> ApiResult<PostDetail> {
    let services = ServiceContext::from_state(&state);
    let detail = services.post().get_by_slug(&slug, viewer.as_ref()).await?;
    JsonApiResponse::ok(detail)
}

async fn create_post(
    State(state): State<Arc<AppState>>,
    guard: EditorGuard,
    Json(body): Json<CreatePostRequest>,
) -> ApiResult<post::Model> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let created = services
        .post()
        .create(
            guard.claims.user_id()?,
            PostInput {
                title: body.title,
                content: body.content,
                post_type: body.post_type,
                excerpt: body.excerpt,
                thumbnail_url: body.thumbnail_url,
                category_ids: body.category_ids,
                publish: body.publish,
            },
        )
        .await?;
    JsonApiResponse::created("Postingan berhasil dibuat", created)
}

async fn update_post(
    State(state): State<Arc<AppState>>,
    _guard: EditorGuard,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePostRequest>,
) -> ApiResult<post::Model> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let updated = services.post().update(id, body.into()).await?;
    JsonApiResponse::ok(updated)
}

async fn delete_post(
    State(state): State<Arc<AppState>>,
    guard: EditorGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let services = ServiceContext::from_state(&state);
    services.post().delete(id, &guard.claims).await?;
    JsonApiResponse::with_status(axum::http::StatusCode::OK, "Postingan berhasil dihapus", ())
}
