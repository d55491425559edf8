use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult, PageParams, PaginatedResponse};
use crate::db::entities::{comment, prelude::Comment};

#[derive(Clone)]
pub struct CommentDao {
    db: DatabaseConnection,
}

impl DaoBase for CommentDao {
    type Entity = Comment;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl CommentDao {
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> DaoResult<comment::Model> {
        let model = comment::ActiveModel {
            post_id: Set(post_id),
            user_id: Set(user_id),
            content: Set(content.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Oldest first so threads read top to bottom.
    pub async fn list_for_post(
        &self,
        post_id: Uuid,
        params: PageParams,
    ) -> DaoResult<PaginatedResponse<comment::Model>> {
        self.find_page(
            params,
            Some((comment::Column::CreatedAt, Order::Asc)),
            move |query| query.filter(comment::Column::PostId.eq(post_id)),
        )
        .await
    }

    pub async fn update_content(&self, id: Uuid, content: &str) -> DaoResult<comment::Model> {
        let content = content.to_string();
        self.update(id, move |active| {
            active.content = Set(content);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::CommentDao;
    use crate::db::dao::{DaoBase, PageParams};
    use crate::test_helpers::comment_model;

    #[tokio::test]
    async fn list_for_post_returns_page() {
        let post_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[comment_model(post_id, user_id, "Masya Allah")]])
            .into_connection();
        let dao = CommentDao::new(&db);

        let page = dao
            .list_for_post(post_id, PageParams::default())
            .await
            .expect("query should succeed");
        assert_eq!(page.data.len(), 1);
        assert!(!page.has_next);
        assert_eq!(page.page_size, 20);
    }
}
