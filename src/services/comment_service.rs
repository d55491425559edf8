use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::{Claims, Role},
    db::dao::{DaoBase, DaoContext, PageParams, PaginatedResponse},
    db::entities::comment,
    error::AppError,
    services::post_service::visible_to,
};

pub const MAX_COMMENT_LEN: usize = 2_000;

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl CommentView {
    fn new(comment: comment::Model, author_name: String) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            author_name,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

fn clean_content(content: &str) -> Result<String, AppError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::bad_request("Komentar tidak boleh kosong"));
    }
    if content.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::bad_request(format!(
            "Komentar maksimal {MAX_COMMENT_LEN} karakter"
        )));
    }
    Ok(content.to_string())
}

#[derive(Clone)]
pub struct CommentService {
    daos: DaoContext,
}

impl CommentService {
    pub fn new(daos: DaoContext) -> Self {
        Self { daos }
    }

    pub async fn list(
        &self,
        post_id: Uuid,
        params: PageParams,
    ) -> Result<PaginatedResponse<CommentView>, AppError> {
        let page = self.daos.comment().list_for_post(post_id, params).await?;
        let mut user_ids: Vec<Uuid> = page.data.iter().map(|c| c.user_id).collect();
        user_ids.sort();
        user_ids.dedup();
        let names: HashMap<Uuid, String> = self
            .daos
            .user()
            .find_by_ids(user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.fullname))
            .collect();

        Ok(page.map(|comment| {
            let name = names
                .get(&comment.user_id)
                .cloned()
                .unwrap_or_else(|| "Anonim".to_string());
            CommentView::new(comment, name)
        }))
    }

    pub async fn create(&self, author: &Claims, post_id: Uuid, content: &str) -> Result<comment::Model, AppError> {
        let content = clean_content(content)?;
        let post = self
            .daos
            .post()
            .find_by_id(post_id)
            .await
            .map_err(|_| AppError::not_found("Postingan tidak ditemukan"))?;
        if !visible_to(&post, Some(author)) {
            return Err(AppError::not_found("Postingan tidak ditemukan"));
        }
        let comment = self
            .daos
            .comment()
            .create_comment(post_id, author.user_id()?, &content)
            .await?;
        tracing::info!(comment_id = %comment.id, %post_id, "comment added");
        Ok(comment)
    }

    pub async fn update(&self, actor: &Claims, id: Uuid, content: &str) -> Result<comment::Model, AppError> {
        let content = clean_content(content)?;
        let comments = self.daos.comment();
        let existing = comments.find_by_id(id).await?;
        if existing.user_id != actor.user_id()? {
            return Err(AppError::forbidden("Anda hanya dapat mengubah komentar sendiri"));
        }
        Ok(comments.update_content(id, &content).await?)
    }

    /// Owners and admins.
    pub async fn delete(&self, actor: &Claims, id: Uuid) -> Result<(), AppError> {
        let comments = self.daos.comment();
        let existing = comments.find_by_id(id).await?;
        if existing.user_id != actor.user_id()? && !actor.role.satisfies(Role::Admin) {
            return Err(AppError::forbidden("Anda tidak dapat menghapus komentar ini"));
        }
        comments.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::CommentService;
    use crate::{
        auth::{Claims, Role},
        db::dao::{DaoContext, PageParams},
        db::entities::post,
        error::AppError,
        test_helpers::{comment_model, post_model, user_model},
    };

    fn service(db: MockDatabase) -> CommentService {
        CommentService::new(DaoContext::new(&db.into_connection()))
    }

    fn claims(user_id: Uuid, role: Role) -> Claims {
        Claims {
            sub: user_id.to_string(),
            email: "jamaah@masjid.id".to_string(),
            role,
            iat: 0,
            exp: usize::MAX,
        }
    }

    #[tokio::test]
    async fn list_attaches_author_names() {
        let post_id = Uuid::new_v4();
        let user = user_model(Uuid::new_v4(), "jamaah@masjid.id", Role::Viewer);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                comment_model(post_id, user.id, "Masya Allah"),
                comment_model(post_id, Uuid::new_v4(), "Subhanallah"),
            ]])
            .append_query_results([[user.clone()]]);

        let page = service(db)
            .list(post_id, PageParams::default())
            .await
            .expect("list should succeed");
        assert_eq!(page.data[0].author_name, user.fullname);
        assert_eq!(page.data[1].author_name, "Anonim");
    }

    #[tokio::test]
    async fn create_requires_existing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()]);

        let err = service(db)
            .create(&claims(Uuid::new_v4(), Role::Viewer), Uuid::new_v4(), "Bagus")
            .await
            .expect_err("missing post should fail");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_refuses_drafts_for_readers() {
        let mut draft = post_model(Uuid::new_v4(), "draft", "artikel");
        draft.published_at = None;
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[draft.clone()]]);

        let err = service(db)
            .create(&claims(Uuid::new_v4(), Role::Viewer), draft.id, "Masya Allah")
            .await
            .expect_err("drafts take no comments from readers");
        assert_eq!(err.message(), "Postingan tidak ditemukan");
    }

    #[tokio::test]
    async fn editors_may_comment_on_drafts() {
        let editor = Uuid::new_v4();
        let mut draft = post_model(Uuid::new_v4(), "draft", "artikel");
        draft.published_at = None;
        let stored = comment_model(draft.id, editor, "Perlu foto tambahan");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[draft.clone()]])
            .append_query_results([[stored.clone()]]);

        let comment = service(db)
            .create(&claims(editor, Role::Editor), draft.id, "Perlu foto tambahan")
            .await
            .expect("editors see drafts");
        assert_eq!(comment.id, stored.id);
    }

    #[tokio::test]
    async fn create_rejects_blank_content() {
        let err = service(MockDatabase::new(DatabaseBackend::Postgres))
            .create(&claims(Uuid::new_v4(), Role::Viewer), Uuid::new_v4(), "   ")
            .await
            .expect_err("blank comment should fail");
        assert_eq!(err.message(), "Komentar tidak boleh kosong");
    }

    #[tokio::test]
    async fn only_owner_updates() {
        let comment = comment_model(Uuid::new_v4(), Uuid::new_v4(), "Asli");
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[comment.clone()]]);

        let err = service(db)
            .update(&claims(Uuid::new_v4(), Role::SuperAdmin), comment.id, "Ubah")
            .await
            .expect_err("non-owner update should fail");
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn admin_deletes_any_comment() {
        let comment = comment_model(Uuid::new_v4(), Uuid::new_v4(), "Spam");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[comment.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]);

        service(db)
            .delete(&claims(Uuid::new_v4(), Role::Admin), comment.id)
            .await
            .expect("admin delete should succeed");
    }

    #[tokio::test]
    async fn viewer_cannot_delete_others_comment() {
        let comment = comment_model(Uuid::new_v4(), Uuid::new_v4(), "Isi");
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[comment.clone()]]);

        let err = service(db)
            .delete(&claims(Uuid::new_v4(), Role::Editor), comment.id)
            .await
            .expect_err("editor is not admin");
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
