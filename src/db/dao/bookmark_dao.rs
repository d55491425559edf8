use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, PageParams, PaginatedResponse};
use crate::db::entities::{bookmark, prelude::Bookmark};

#[derive(Clone)]
pub struct BookmarkDao {
    db: DatabaseConnection,
}

impl DaoBase for BookmarkDao {
    type Entity = Bookmark;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl BookmarkDao {
    pub async fn find_for(&self, user_id: Uuid, post_id: Uuid) -> DaoResult<Option<bookmark::Model>> {
        self.find_one(move |query| {
            query
                .filter(bookmark::Column::UserId.eq(user_id))
                .filter(bookmark::Column::PostId.eq(post_id))
        })
        .await
    }

    pub async fn create_bookmark(&self, user_id: Uuid, post_id: Uuid) -> DaoResult<bookmark::Model> {
        let model = bookmark::ActiveModel {
            user_id: Set(user_id),
            post_id: Set(post_id),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        params: PageParams,
    ) -> DaoResult<PaginatedResponse<bookmark::Model>> {
        self.find_page(params, None, move |query| {
            query.filter(bookmark::Column::UserId.eq(user_id))
        })
        .await
    }

    /// Returns whether a bookmark was removed.
    pub async fn delete_for(&self, user_id: Uuid, post_id: Uuid) -> DaoResult<bool> {
        let result = Bookmark::delete_many()
            .filter(bookmark::Column::UserId.eq(user_id))
            .filter(bookmark::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }
}
