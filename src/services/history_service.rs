use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, DaoContext, PageParams, PaginatedResponse},
    db::entities::history,
    error::AppError,
    services::{bookmark_service::posts_by_id, post_service::PostSummary},
};

#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub id: Uuid,
    pub post: Option<PostSummary>,
    pub viewed_at: DateTime<FixedOffset>,
}

#[derive(Clone)]
pub struct HistoryService {
    daos: DaoContext,
}

impl HistoryService {
    pub fn new(daos: DaoContext) -> Self {
        Self { daos }
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        params: PageParams,
    ) -> Result<PaginatedResponse<HistoryView>, AppError> {
        let page = self.daos.history().list_for_user(user_id, params).await?;
        let mut posts = posts_by_id(&self.daos, page.data.iter().map(|h| h.post_id).collect()).await?;
        Ok(page.map(|entry| HistoryView {
            id: entry.id,
            post: posts.remove(&entry.post_id).map(PostSummary::from),
            viewed_at: entry.viewed_at,
        }))
    }

    pub async fn record(&self, user_id: Uuid, post_id: Uuid) -> Result<history::Model, AppError> {
        self.daos
            .post()
            .find_by_id(post_id)
            .await
            .map_err(|_| AppError::not_found("Postingan tidak ditemukan"))?;
        Ok(self
            .daos
            .history()
            .record_view(user_id, post_id, Utc::now().fixed_offset())
            .await?)
    }

    pub async fn delete_entry(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.daos.history().delete_for_user(user_id, id).await? {
            return Err(AppError::not_found("Riwayat tidak ditemukan"));
        }
        Ok(())
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<u64, AppError> {
        Ok(self.daos.history().clear_for_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::HistoryService;
    use crate::{
        db::dao::DaoContext,
        db::entities::{history, post},
        error::AppError,
        test_helpers::{history_model, post_model, ts},
    };

    fn service(db: MockDatabase) -> HistoryService {
        HistoryService::new(DaoContext::new(&db.into_connection()))
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn record_requires_existing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()]);

        let err = service(db)
            .record(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("missing post should fail");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn record_creates_first_view() {
        let user_id = Uuid::new_v4();
        let post = post_model(Uuid::new_v4(), "a", "artikel");
        let entry = history_model(user_id, post.id, ts());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post.clone()]])
            .append_query_results([Vec::<history::Model>::new()])
            .append_query_results([[entry.clone()]]);

        let recorded = service(db)
            .record(user_id, post.id)
            .await
            .expect("record should succeed");
        assert_eq!(recorded.id, entry.id);
    }

    #[tokio::test]
    async fn delete_entry_of_other_user_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec(0)]);

        let err = service(db)
            .delete_entry(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("foreign entry should not be deleted");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn clear_reports_removed_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec(4)]);

        let removed = service(db).clear(Uuid::new_v4()).await.expect("clear should succeed");
        assert_eq!(removed, 4);
    }
}
