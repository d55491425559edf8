use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, PageParams, PaginatedResponse};
use crate::db::entities::{history, prelude::History};

#[derive(Clone)]
pub struct HistoryDao {
    db: DatabaseConnection,
}

impl DaoBase for HistoryDao {
    type Entity = History;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl HistoryDao {
    /// One row per user and post; a repeat view only moves `viewed_at`.
    pub async fn record_view(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        at: DateTime<FixedOffset>,
    ) -> DaoResult<history::Model> {
        let existing = self
            .find_one(move |query| {
                query
                    .filter(history::Column::UserId.eq(user_id))
                    .filter(history::Column::PostId.eq(post_id))
            })
            .await?;

        match existing {
            Some(entry) => {
                self.update(entry.id, move |active| {
                    active.viewed_at = Set(at);
                })
                .await
            }
            None => {
                self.create(history::ActiveModel {
                    user_id: Set(user_id),
                    post_id: Set(post_id),
                    viewed_at: Set(at),
                    ..Default::default()
                })
                .await
            }
        }
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        params: PageParams,
    ) -> DaoResult<PaginatedResponse<history::Model>> {
        self.find_page(
            params,
            Some((history::Column::ViewedAt, Order::Desc)),
            move |query| query.filter(history::Column::UserId.eq(user_id)),
        )
        .await
    }

    /// Deletes one entry if it belongs to the user.
    pub async fn delete_for_user(&self, user_id: Uuid, id: Uuid) -> DaoResult<bool> {
        let result = History::delete_many()
            .filter(history::Column::Id.eq(id))
            .filter(history::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    pub async fn clear_for_user(&self, user_id: Uuid) -> DaoResult<u64> {
        let result = History::delete_many()
            .filter(history::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
