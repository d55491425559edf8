use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{config::StorageConfig, error::AppError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Where uploaded image bytes live.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<StoredObject, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(cfg: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&cfg.upload_dir),
            public_base_url: cfg.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(AppError::bad_request("Kunci berkas tidak valid"));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, key: &str, _content_type: &str, bytes: Vec<u8>) -> Result<StoredObject, AppError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| AppError::internal_with_source("Gagal menyimpan berkas", err))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| AppError::internal_with_source("Gagal menyimpan berkas", err))?;
        tracing::info!(key, "object stored");

        Ok(StoredObject {
            key: key.to_string(),
            url: format!("{}/{key}", self.public_base_url),
        })
    }

    /// Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::internal_with_source("Gagal menghapus berkas", err)),
        }
    }
}

/// `<uuid>.<ext>` for an image content type.
pub fn object_key_for(content_type: &str) -> Result<String, AppError> {
    let extension = match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/avif" => "avif",
        _ => return Err(AppError::bad_request("Hanya berkas gambar yang diperbolehkan")),
    };
    Ok(format!("{}.{extension}", uuid::Uuid::new_v4()))
}
