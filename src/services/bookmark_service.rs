use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, DaoContext, PageParams, PaginatedResponse},
    db::entities::{bookmark, post},
    error::AppError,
    services::post_service::PostSummary,
};

#[derive(Debug, Clone, Serialize)]
pub struct BookmarkView {
    pub id: Uuid,
    pub post: Option<PostSummary>,
    pub created_at: DateTime<FixedOffset>,
}

/// Loads the posts behind a page of rows keyed by post id.
pub(crate) async fn posts_by_id(
    daos: &DaoContext,
    post_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, post::Model>, AppError> {
    Ok(daos
        .post()
        .find_by_ids(post_ids)
        .await?
        .into_iter()
        .map(|post| (post.id, post))
        .collect())
}

#[derive(Clone)]
pub struct BookmarkService {
    daos: DaoContext,
}

impl BookmarkService {
    pub fn new(daos: DaoContext) -> Self {
        Self { daos }
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        params: PageParams,
    ) -> Result<PaginatedResponse<BookmarkView>, AppError> {
        let page = self.daos.bookmark().list_for_user(user_id, params).await?;
        let mut posts = posts_by_id(&self.daos, page.data.iter().map(|b| b.post_id).collect()).await?;
        Ok(page.map(|bookmark| BookmarkView {
            id: bookmark.id,
            post: posts.remove(&bookmark.post_id).map(PostSummary::from),
            created_at: bookmark.created_at,
        }))
    }

    pub async fn add(&self, user_id: Uuid, post_id: Uuid) -> Result<bookmark::Model, AppError> {
        self.daos
            .post()
            .find_by_id(post_id)
            .await
            .map_err(|_| AppError::not_found("Postingan tidak ditemukan"))?;
        let bookmarks = self.daos.bookmark();
        if bookmarks.find_for(user_id, post_id).await?.is_some() {
            return Err(AppError::conflict("Postingan sudah ada di bookmark"));
        }
        Ok(bookmarks.create_bookmark(user_id, post_id).await?)
    }

    pub async fn remove(&self, user_id: Uuid, post_id: Uuid) -> Result<(), AppError> {
        if !self.daos.bookmark().delete_for(user_id, post_id).await? {
            return Err(AppError::not_found("Bookmark tidak ditemukan"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::BookmarkService;
    use crate::{
        db::dao::{DaoContext, PageParams},
        error::AppError,
        test_helpers::{bookmark_model, post_model},
    };

    fn service(db: MockDatabase) -> BookmarkService {
        BookmarkService::new(DaoContext::new(&db.into_connection()))
    }

    #[tokio::test]
    async fn add_rejects_duplicate() {
        let user_id = Uuid::new_v4();
        let post = post_model(Uuid::new_v4(), "a", "artikel");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post.clone()]])
            .append_query_results([[bookmark_model(user_id, post.id)]]);

        let err = service(db)
            .add(user_id, post.id)
            .await
            .expect_err("duplicate should fail");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn add_creates_bookmark() {
        let user_id = Uuid::new_v4();
        let post = post_model(Uuid::new_v4(), "a", "artikel");
        let created = bookmark_model(user_id, post.id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post.clone()]])
            .append_query_results([Vec::<crate::db::entities::bookmark::Model>::new()])
            .append_query_results([[created.clone()]]);

        let bookmark = service(db).add(user_id, post.id).await.expect("add should succeed");
        assert_eq!(bookmark.id, created.id);
    }

    #[tokio::test]
    async fn remove_missing_bookmark_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }]);

        let err = service(db)
            .remove(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("nothing to remove");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_embeds_post_summaries() {
        let user_id = Uuid::new_v4();
        let post = post_model(Uuid::new_v4(), "kajian", "artikel");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[bookmark_model(user_id, post.id)]])
            .append_query_results([[post.clone()]]);

        let page = service(db)
            .list(user_id, PageParams::default())
            .await
            .expect("list should succeed");
        assert_eq!(page.data[0].post.as_ref().map(|p| p.slug.as_str()), Some("kajian"));
    }
}
