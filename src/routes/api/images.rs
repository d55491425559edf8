use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State, multipart::MultipartError},
    http::StatusCode,
    routing::{delete, get},
};
use serde::Deserialize;
use tower_http::limit::RequestBodyLimitLayer;
use uuid::Uuid;

use crate::{
    db::entities::image,
    error::AppError,
    middleware::EditorGuard,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, image_service::ImageUpload},
    state::AppState,
};

/// Room for multipart boundaries and the text fields next to the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
pub struct ImageListQuery {
    pub post_id: Uuid,
}

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.storage.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    Router::new()
        .route("/images", get(list_images).post(upload_image))
        .route("/images/{id}", delete(delete_image))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}

async fn list_images(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ImageListQuery>,
) -> ApiResult<Vec<image::Model>> {
    let services = ServiceContext::from_state(&state);
    JsonApiResponse::ok(services.image(&state).list(query.post_id).await?)
}

async fn upload_image(
    State(state): State<Arc<AppState>>,
    _guard: EditorGuard,
    multipart: Multipart,
) -> ApiResult<image::Model> {
    let upload = read_upload(multipart).await?;
    let services = ServiceContext::from_state(&state);
    let created = services.image(&state).upload(upload).await?;
    JsonApiResponse::created("Gambar berhasil diunggah", created)
}

async fn delete_image(
    State(state): State<Arc<AppState>>,
    _guard: EditorGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let services = ServiceContext::from_state(&state);
    services.image(&state).delete(id).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Gambar berhasil dihapus", ())
}

async fn read_upload(mut multipart: Multipart) -> Result<ImageUpload, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut post_id: Option<Uuid> = None;
    let mut caption: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((content_type, bytes.to_vec()));
            }
            Some("post_id") => {
                let text = field.text().await.map_err(multipart_error)?;
                let id = Uuid::parse_str(text.trim())
                    .map_err(|_| AppError::bad_request("post_id tidak valid"))?;
                post_id = Some(id);
            }
            Some("caption") => {
                caption = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (content_type, bytes) =
        file.ok_or_else(|| AppError::bad_request("Berkas gambar wajib diunggah"))?;
    let post_id = post_id.ok_or_else(|| AppError::bad_request("post_id wajib diisi"))?;
    Ok(ImageUpload {
        post_id,
        content_type,
        bytes,
        caption,
    })
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::payload_too_large("Ukuran berkas terlalu besar");
    }
    AppError::bad_request(format!("Form unggahan tidak valid: {}", err.body_text()))
}
