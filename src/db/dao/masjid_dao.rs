use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{masjid, prelude::Masjid};

#[derive(Clone)]
pub struct MasjidDao {
    db: DatabaseConnection,
}

impl DaoBase for MasjidDao {
    type Entity = Masjid;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone, Default)]
pub struct MasjidProfile {
    pub location: String,
    pub architect: Option<String>,
    pub year_built: Option<i32>,
    pub style: Option<String>,
    pub map_url: Option<String>,
    pub capacity: Option<i32>,
}

impl MasjidDao {
    pub async fn create_profile(
        &self,
        post_id: Uuid,
        profile: MasjidProfile,
    ) -> DaoResult<masjid::Model> {
        let model = masjid::ActiveModel {
            post_id: Set(post_id),
            location: Set(profile.location),
            architect: Set(profile.architect),
            year_built: Set(profile.year_built),
            style: Set(profile.style),
            map_url: Set(profile.map_url),
            capacity: Set(profile.capacity),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_post_id(&self, post_id: Uuid) -> DaoResult<Option<masjid::Model>> {
        self.find_one(move |query| query.filter(masjid::Column::PostId.eq(post_id)))
            .await
    }

    pub async fn find_by_post_ids(&self, post_ids: Vec<Uuid>) -> DaoResult<Vec<masjid::Model>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_all(None, move |query| {
            query.filter(masjid::Column::PostId.is_in(post_ids))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{MasjidDao, MasjidProfile};
    use crate::db::dao::DaoBase;
    use crate::test_helpers::masjid_model;

    #[tokio::test]
    async fn create_profile_links_post() {
        let post_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[masjid_model(post_id, "Jakarta Pusat")]])
            .into_connection();
        let dao = MasjidDao::new(&db);

        let created = dao
            .create_profile(
                post_id,
                MasjidProfile {
                    location: "Jakarta Pusat".to_string(),
                    ..Default::default()
                },
            )
            .await
            .expect("insert should succeed");
        assert_eq!(created.post_id, post_id);
        assert_eq!(created.location, "Jakarta Pusat");
    }

    #[tokio::test]
    async fn find_by_post_ids_skips_empty_input() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let dao = MasjidDao::new(&db);

        let rows = dao
            .find_by_post_ids(Vec::new())
            .await
            .expect("no query needed");
        assert!(rows.is_empty());
    }
}
