use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::dao::{MasjidProfile, PageParams, PaginatedResponse},
    middleware::{EditorGuard, OptionalClaims},
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        masjid_service::{MasjidInput, MasjidProfileUpdate, MasjidUpdate, MasjidView},
        post_service::PostUpdate,
    },
    state::AppState,
};

use super::{nullable, validated};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMasjidRequest {
    #[validate(length(min = 1, max = 200, message = "Nama masjid wajib diisi (maksimal 200 karakter)"))]
    pub title: String,
    #[validate(length(min = 1, message = "Deskripsi wajib diisi"))]
    pub content: String,
    pub excerpt: Option<String>,
    #[validate(url(message = "URL thumbnail tidak valid"))]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    pub publish: bool,
    #[validate(length(min = 1, message = "Lokasi wajib diisi"))]
    pub location: String,
    pub architect: Option<String>,
    #[validate(range(min = 0, max = 3000, message = "Tahun berdiri tidak valid"))]
    pub year_built: Option<i32>,
    pub style: Option<String>,
    #[validate(url(message = "URL peta tidak valid"))]
    pub map_url: Option<String>,
    #[validate(range(min = 0, message = "Kapasitas tidak boleh negatif"))]
    pub capacity: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMasjidRequest {
    #[validate(length(min = 1, max = 200, message = "Nama masjid wajib diisi (maksimal 200 karakter)"))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub excerpt: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub thumbnail_url: Option<Option<String>>,
    pub category_ids: Option<Vec<Uuid>>,
    pub publish: Option<bool>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub architect: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub year_built: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub style: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub map_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub capacity: Option<Option<i32>>,
}

impl From<CreateMasjidRequest> for MasjidInput {
    fn from(body: CreateMasjidRequest) -> Self {
        Self {
            title: body.title,
            content: body.content,
            excerpt: body.excerpt,
            thumbnail_url: body.thumbnail_url,
            category_ids: body.category_ids,
            publish: body.publish,
            profile: MasjidProfile {
                location: body.location,
                architect: body.architect,
                year_built: body.year_built,
                style: body.style,
                map_url: body.map_url,
                capacity: body.capacity,
            },
        }
    }
}

impl From<UpdateMasjidRequest> for MasjidUpdate {
    fn from(body: UpdateMasjidRequest) -> Self {
        Self {
            post: PostUpdate {
                title: body.title,
                content: body.content,
                excerpt: body.excerpt,
                thumbnail_url: body.thumbnail_url,
                category_ids: body.category_ids,
                publish: body.publish,
            },
            profile: MasjidProfileUpdate {
                location: body.location,
                architect: body.architect,
                year_built: body.year_built,
                style: body.style,
                map_url: body.map_url,
                capacity: body.capacity,
            },
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/masjids", get(list_masjids).post(create_masjid))
        .route(
            "/masjids/{post_id}",
            get(get_masjid).put(update_masjid).delete(delete_masjid),
        )
        .with_state(state)
}

async fn list_masjids(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> ApiResult<PaginatedResponse<MasjidView>> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.masjid().list(params).await?)
}

async fn get_masjid(
    State(state): State<Arc<AppState>>,
    OptionalClaims(viewer): OptionalClaims,
    Path(post_id): Path<Uuid>,
) -> ApiResult<MasjidView> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.masjid().get(post_id, viewer.as_ref()).await?)
}

async fn create_masjid(
    State(state): State<Arc<AppState>>,
    guard: EditorGuard,
    Json(body): Json<CreateMasjidRequest>,
) -> ApiResult<MasjidView> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let created = services
        .masjid()
        .create(guard.claims.user_id()?, body.into())
        .await?;
    JsonApiResponse::created("Masjid berhasil ditambahkan", created)
}

async fn update_masjid(
    State(state): State<Arc<AppState>>,
    _guard: EditorGuard,
    Path(post_id): Path<Uuid>,
    Json(body): Json<UpdateMasjidRequest>,
) -> ApiResult<MasjidView> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let updated = services.masjid().update(post_id, body.into()).await?;
    JsonApiResponse::ok(updated)
}

async fn delete_masjid(
    State(state): State<Arc<AppState>>,
    guard: EditorGuard,
    Path(post_id): Path<Uuid>,
) -> ApiResult<()> {
    let services = ServiceContext::from_state(&state);
    services.masjid().delete(post_id, &guard.claims).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Masjid berhasil dihapus", ())
}

#[cfg(test)]
mod tests {
    use super::UpdateMasjidRequest;

    #[test]
    fn update_distinguishes_null_from_absent() {
        let body: UpdateMasjidRequest =
            serde_json::from_str(r#"{"architect": null, "capacity": 900}"#).expect("valid json");
        assert_eq!(body.architect, Some(None));
        assert_eq!(body.capacity, Some(Some(900)));
        assert_eq!(body.style, None);
    }
}
