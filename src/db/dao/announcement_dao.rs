use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult, PageParams, PaginatedResponse};
use crate::db::entities::{announcement, prelude::Announcement};

#[derive(Clone)]
pub struct AnnouncementDao {
    db: DatabaseConnection,
}

impl DaoBase for AnnouncementDao {
    type Entity = Announcement;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AnnouncementDao {
    pub async fn create_announcement(
        &self,
        author_id: Uuid,
        title: &str,
        content: &str,
        is_active: bool,
    ) -> DaoResult<announcement::Model> {
        let model = announcement::ActiveModel {
            author_id: Set(author_id),
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            is_active: Set(is_active),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_active(&self) -> DaoResult<Vec<announcement::Model>> {
        self.find_all(None, |query| {
            query.filter(announcement::Column::IsActive.eq(true))
        })
        .await
    }

    pub async fn list_page(
        &self,
        params: PageParams,
    ) -> DaoResult<PaginatedResponse<announcement::Model>> {
        self.find_page(params, None, |query| query).await
    }
}
