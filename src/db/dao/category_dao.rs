use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{category, prelude::Category};

#[derive(Clone)]
pub struct CategoryDao {
    db: DatabaseConnection,
}

impl DaoBase for CategoryDao {
    type Entity = Category;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl CategoryDao {
    pub async fn create_category(
        &self,
        name: &str,
        slug: &str,
        description: Option<String>,
    ) -> DaoResult<category::Model> {
        let model = category::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            description: Set(description),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> DaoResult<Option<category::Model>> {
        let slug = slug.to_string();
        self.find_one(move |query| query.filter(category::Column::Slug.eq(slug)))
            .await
    }

    pub async fn find_by_name(&self, name: &str) -> DaoResult<Option<category::Model>> {
        let name = name.to_string();
        self.find_one(move |query| query.filter(category::Column::Name.eq(name)))
            .await
    }

    pub async fn list_all(&self) -> DaoResult<Vec<category::Model>> {
        self.find_all(Some((category::Column::Name, Order::Asc)), |query| query)
            .await
    }

    pub async fn find_by_ids(&self, ids: Vec<Uuid>) -> DaoResult<Vec<category::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_all(Some((category::Column::Name, Order::Asc)), move |query| {
            query.filter(category::Column::Id.is_in(ids))
        })
        .await
    }
}
