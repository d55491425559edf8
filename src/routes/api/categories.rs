use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::entities::category,
    middleware::AdminGuard,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

use super::{nullable, validated};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Nama kategori harus 1 sampai 100 karakter"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Nama kategori harus 1 sampai 100 karakter"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .with_state(state)
}

async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<Vec<category::Model>> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.category().list().await?)
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    _guard: AdminGuard,
    Json(body): Json<CreateCategoryRequest>,
) -> ApiResult<category::Model> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let created = services
        .category()
        .create(&body.name, body.description)
        .await?;
    JsonApiResponse::created("Kategori berhasil dibuat", created)
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    _guard: AdminGuard,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCategoryRequest>,
) -> ApiResult<category::Model> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let updated = services
        .category()
        .update(id, body.name, body.description)
        .await?;
    JsonApiResponse::ok(updated)
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    _guard: AdminGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let services = ServiceContext::from_state(&state);
    services.category().delete(id).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Kategori berhasil dihapus", ())
}
