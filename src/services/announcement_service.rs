use sea_orm::Set;
use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, DaoContext, PageParams, PaginatedResponse},
    db::entities::announcement,
    error::AppError,
};

#[derive(Debug, Clone)]
pub struct AnnouncementInput {
    pub title: String,
    pub content: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AnnouncementUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct AnnouncementService {
    daos: DaoContext,
}

impl AnnouncementService {
    pub fn new(daos: DaoContext) -> Self {
        Self { daos }
    }

    pub async fn list_active(&self) -> Result<Vec<announcement::Model>, AppError> {
        Ok(self.daos.announcement().list_active().await?)
    }

    pub async fn list_all(&self, params: PageParams) -> Result<PaginatedResponse<announcement::Model>, AppError> {
        Ok(self.daos.announcement().list_page(params).await?)
    }

    pub async fn create(&self, author_id: Uuid, input: AnnouncementInput) -> Result<announcement::Model, AppError> {
        let title = input.title.trim();
        let content = input.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AppError::bad_request("Judul dan isi pengumuman wajib diisi"));
        }
        Ok(self
            .daos
            .announcement()
            .create_announcement(author_id, title, content, input.is_active)
            .await?)
    }

    pub async fn update(&self, id: Uuid, update: AnnouncementUpdate) -> Result<announcement::Model, AppError> {
        let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());
        if blank(&update.title) || blank(&update.content) {
            return Err(AppError::bad_request("Judul dan isi pengumuman wajib diisi"));
        }
        Ok(self
            .daos
            .announcement()
            .update(id, move |active: &mut announcement::ActiveModel| {
                if let Some(title) = update.title {
                    active.title = Set(title.trim().to_string());
                }
                if let Some(content) = update.content {
                    active.content = Set(content.trim().to_string());
                }
                if let Some(is_active) = update.is_active {
                    active.is_active = Set(is_active);
                }
            })
            .await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.daos.announcement().delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::{AnnouncementInput, AnnouncementService, AnnouncementUpdate};
    use crate::{db::dao::DaoContext, error::AppError, test_helpers::announcement_model};

    fn service(db: MockDatabase) -> AnnouncementService {
        AnnouncementService::new(DaoContext::new(&db.into_connection()))
    }

    #[tokio::test]
    async fn create_requires_title_and_content() {
        let err = service(MockDatabase::new(DatabaseBackend::Postgres))
            .create(
                Uuid::new_v4(),
                AnnouncementInput {
                    title: "Kajian".to_string(),
                    content: " ".to_string(),
                    is_active: true,
                },
            )
            .await
            .expect_err("blank content should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn deactivating_updates_flag() {
        let author = Uuid::new_v4();
        let active = announcement_model(author, "Kajian Subuh", true);
        let inactive = announcement_model(author, "Kajian Subuh", false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[active.clone()]])
            .append_query_results([[inactive]]);

        let updated = service(db)
            .update(
                active.id,
                AnnouncementUpdate {
                    is_active: Some(false),
                    ..AnnouncementUpdate::default()
                },
            )
            .await
            .expect("update should succeed");
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn delete_missing_announcement_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }]);

        let err = service(db)
            .delete(Uuid::new_v4())
            .await
            .expect_err("nothing to delete");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
