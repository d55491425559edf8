use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::Session, session};

#[derive(Clone)]
pub struct SessionDao {
    db: DatabaseConnection,
}

impl DaoBase for SessionDao {
    type Entity = Session;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl SessionDao {
    pub async fn create_session(
        &self,
        user_id: Uuid,
        token: &str,
        expires: DateTime<FixedOffset>,
    ) -> DaoResult<session::Model> {
        let model = session::ActiveModel {
            user_id: Set(user_id),
            session_token: Set(token.to_string()),
            expires: Set(expires),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<session::Model>> {
        let token = token.to_string();
        self.find_one(move |query| query.filter(session::Column::SessionToken.eq(token)))
            .await
    }

    /// Returns whether a row was removed.
    pub async fn delete_by_token(&self, token: &str) -> DaoResult<bool> {
        let result = Session::delete_many()
            .filter(session::Column::SessionToken.eq(token))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_for_user(&self, user_id: Uuid) -> DaoResult<u64> {
        let result = Session::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
