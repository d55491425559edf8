use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{image, prelude::Image};

#[derive(Clone)]
pub struct ImageDao {
    db: DatabaseConnection,
}

impl DaoBase for ImageDao {
    type Entity = Image;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub post_id: Uuid,
    pub url: String,
    pub storage_key: String,
    pub content_type: String,
    pub caption: Option<String>,
}

impl ImageDao {
    pub async fn create_image(&self, new_image: NewImage) -> DaoResult<image::Model> {
        let model = image::ActiveModel {
            post_id: Set(new_image.post_id),
            url: Set(new_image.url),
            storage_key: Set(new_image.storage_key),
            content_type: Set(new_image.content_type),
            caption: Set(new_image.caption),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_for_post(&self, post_id: Uuid) -> DaoResult<Vec<image::Model>> {
        self.find_all(Some((image::Column::CreatedAt, Order::Asc)), move |query| {
            query.filter(image::Column::PostId.eq(post_id))
        })
        .await
    }
}
