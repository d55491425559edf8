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
        entities::announcement,
    },
    middleware::AdminGuard,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        announcement_service::{AnnouncementInput, AnnouncementUpdate},
    },
    state::AppState,
};

use super::validated;

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 200, message = "Judul harus 1 sampai 200 karakter"))]
    pub title: String,
    #[validate(length(min = 1, message = "Isi pengumuman wajib diisi"))]
    pub content: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAnnouncementRequest {
    #[validate(length(min = 1, max = 200, message = "Judul harus 1 sampai 200 karakter"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Isi pengumuman wajib diisi"))]
    pub content: Option<String>,
    pub is_active: Option<bool>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/announcements",
            get(list_active).post(create_announcement),
        )
        .route("/announcements/all", get(list_all))
        .route(
            "/announcements/{id}",
            put(update_announcement).delete(delete_announcement),
        )
        .with_state(state)
}

async fn list_active(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<announcement::Model>> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.announcement().list_active().await?)
}

async fn list_all(
    State(state): State<Arc<AppState>>,
    _guard: AdminGuard,
    Query(params): Query<PageParams>,
) -> ApiResult<PaginatedResponse<announcement::Model>> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.announcement().list_all(params).await?)
}

async fn create_announcement(
    State(state): State<Arc<AppState>>,
    guard: AdminGuard,
    Json(body): Json<CreateAnnouncementRequest>,
) -> ApiResult<announcement::Model> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let created = services
        .announcement()
        .create(
            guard.claims.user_id()?,
            AnnouncementInput {
                title: body.title,
                content: body.content,
                is_active: body.is_active,
            },
        )
        .await?;
    JsonApiResponse::created("Pengumuman berhasil dibuat", created)
}

async fn update_announcement(
    State(state): State<Arc<AppState>>,
    _guard: AdminGuard,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAnnouncementRequest>,
) -> ApiResult<announcement::Model> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let updated = services
        .announcement()
        .update(
            id,
            AnnouncementUpdate {
                title: body.title,
                content: body.content,
                is_active: body.is_active,
            },
        )
        .await?;
    JsonApiResponse::ok(updated)
}

async fn delete_announcement(
    State(state): State<Arc<AppState>>,
    _guard: AdminGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let services = ServiceContext::from_state(&state);
    services.announcement().delete(id).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Pengumuman berhasil dihapus", ())
}
