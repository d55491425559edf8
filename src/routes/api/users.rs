use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Role,
    db::dao::{PageParams, PaginatedResponse, UserListFilter},
    middleware::{AdminGuard, AuthGuard, SuperAdminGuard},
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        user_service::{ProfileUpdate, UserView},
    },
    state::AppState,
};

use super::{nullable, validated};

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub q: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Nama lengkap harus 1 sampai 100 karakter"))]
    pub fullname: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub avatar_url: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", put(update_me))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/role", put(change_role))
        .with_state(state)
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    _guard: AdminGuard,
    Query(params): Query<PageParams>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<PaginatedResponse<UserView>> {
    let services = ServiceContext::from_state(&state);
    let filter = UserListFilter {
        email_contains: query.q.filter(|q| !q.trim().is_empty()),
        role: query.role,
    };
    JsonApiResponse::ok(services.user().list(params, filter).await?)
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    _guard: AdminGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<UserView> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.user().get(id).await?)
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<UpdateProfileRequest>,
) -> ApiResult<UserView> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let updated = services
        .user()
        .update_profile(
            claims.user_id()?,
            ProfileUpdate {
                fullname: body.fullname,
                avatar_url: body.avatar_url,
            },
        )
        .await?;
    JsonApiResponse::ok(updated)
}

async fn change_role(
    State(state): State<Arc<AppState>>,
    guard: SuperAdminGuard,
    Path(id): Path<Uuid>,
    Json(body): Json<ChangeRoleRequest>,
) -> ApiResult<UserView> {
    let services = ServiceContext::from_state(&state);
    let updated = services
        .user()
        .set_role(guard.claims.user_id()?, id, body.role)
        .await?;
    JsonApiResponse::ok(updated)
}
