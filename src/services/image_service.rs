use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, DaoContext, NewImage},
    db::entities::image,
    error::AppError,
    storage::{ObjectStorage, object_key_for},
};

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub post_id: Uuid,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub caption: Option<String>,
}

#[derive(Clone)]
pub struct ImageService {
    daos: DaoContext,
    storage: Arc<dyn ObjectStorage>,
    max_bytes: usize,
}

impl ImageService {
    pub fn new(daos: DaoContext, storage: Arc<dyn ObjectStorage>, max_bytes: usize) -> Self {
        Self {
            daos,
            storage,
            max_bytes,
        }
    }

    pub async fn list(&self, post_id: Uuid) -> Result<Vec<image::Model>, AppError> {
        Ok(self.daos.image().list_for_post(post_id).await?)
    }

    pub async fn upload(&self, upload: ImageUpload) -> Result<image::Model, AppError> {
        if upload.bytes.is_empty() {
            return Err(AppError::bad_request("Berkas tidak boleh kosong"));
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(AppError::payload_too_large(format!(
                "Ukuran berkas melebihi batas {} byte",
                self.max_bytes
            )));
        }
        let key = object_key_for(&upload.content_type)?;
        self.daos
            .post()
            .find_by_id(upload.post_id)
            .await
            .map_err(|_| AppError::not_found("Postingan tidak ditemukan"))?;

        let stored = self
            .storage
            .put(&key, &upload.content_type, upload.bytes)
            .await?;
        let created = self
            .daos
            .image()
            .create_image(NewImage {
                post_id: upload.post_id,
                url: stored.url,
                storage_key: stored.key,
                content_type: upload.content_type,
                caption: upload.caption.filter(|c| !c.trim().is_empty()),
            })
            .await;

        match created {
            Ok(image) => Ok(image),
            Err(err) => {
                if let Err(cleanup) = self.storage.delete(&key).await {
                    tracing::warn!(error = %cleanup, key, "orphaned upload left in storage");
                }
                Err(err.into())
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let images = self.daos.image();
        let image = images.find_by_id(id).await?;
        images.delete(id).await?;
        if let Err(err) = self.storage.delete(&image.storage_key).await {
            tracing::warn!(error = %err, key = %image.storage_key, "stored object not removed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::{ImageService, ImageUpload};
    use crate::{
        db::dao::DaoContext,
        error::AppError,
        storage::{ObjectStorage, StoredObject},
        test_helpers::{image_model, post_model},
    };

    #[derive(Default)]
    struct RecordingStorage {
        puts: Mutex<Vec<String>>,
        deletes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ObjectStorage for RecordingStorage {
        async fn put(&self, key: &str, _content_type: &str, _bytes: Vec<u8>) -> Result<StoredObject, AppError> {
            self.puts.lock().expect("lock").push(key.to_string());
            Ok(StoredObject {
                key: key.to_string(),
                url: format!("/uploads/{key}"),
            })
        }

        async fn delete(&self, key: &str) -> Result<(), AppError> {
            self.deletes.lock().expect("lock").push(key.to_string());
            Ok(())
        }
    }

    fn service(db: MockDatabase, storage: Arc<RecordingStorage>) -> ImageService {
        ImageService::new(DaoContext::new(&db.into_connection()), storage, 16)
    }

    fn upload(content_type: &str, size: usize) -> ImageUpload {
        ImageUpload {
            post_id: Uuid::new_v4(),
            content_type: content_type.to_string(),
            bytes: vec![7; size],
            caption: Some("Mihrab".to_string()),
        }
    }

    #[tokio::test]
    async fn rejects_oversized_uploads() {
        let storage = Arc::new(RecordingStorage::default());
        let err = service(MockDatabase::new(DatabaseBackend::Postgres), storage)
            .upload(upload("image/png", 17))
            .await
            .expect_err("too large");
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[tokio::test]
    async fn rejects_non_images() {
        let storage = Arc::new(RecordingStorage::default());
        let err = service(MockDatabase::new(DatabaseBackend::Postgres), storage)
            .upload(upload("application/pdf", 4))
            .await
            .expect_err("pdf is not an image");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn stores_object_and_row() {
        let storage = Arc::new(RecordingStorage::default());
        let request = upload("image/png", 4);
        let post = post_model(Uuid::new_v4(), "a", "masjid");
        let row = image_model(request.post_id, "stored.png");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post]])
            .append_query_results([[row.clone()]]);

        let image = service(db, storage.clone())
            .upload(request)
            .await
            .expect("upload should succeed");
        assert_eq!(image.id, row.id);
        assert_eq!(storage.puts.lock().expect("lock").len(), 1);
        assert!(storage.deletes.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn removes_object_when_row_insert_fails() {
        let storage = Arc::new(RecordingStorage::default());
        let post = post_model(Uuid::new_v4(), "a", "masjid");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post]])
            .append_query_errors([DbErr::Custom("insert failed".to_string())]);

        service(db, storage.clone())
            .upload(upload("image/jpeg", 4))
            .await
            .expect_err("insert failure should surface");
        let puts = storage.puts.lock().expect("lock").clone();
        assert_eq!(*storage.deletes.lock().expect("lock"), puts);
    }

    #[tokio::test]
    async fn delete_removes_row_then_object() {
        let storage = Arc::new(RecordingStorage::default());
        let row = image_model(Uuid::new_v4(), "old.png");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]);

        service(db, storage.clone())
            .delete(row.id)
            .await
            .expect("delete should succeed");
        assert_eq!(*storage.deletes.lock().expect("lock"), vec!["old.png".to_string()]);
    }
}
