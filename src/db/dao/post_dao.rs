use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Query,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, PageParams, PaginatedResponse};
use crate::db::entities::prelude::{Post, PostCategory};
use crate::db::entities::{post, post_category};

#[derive(Clone)]
pub struct PostDao {
    db: DatabaseConnection,
}

impl DaoBase for PostDao {
    type Entity = Post;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Clone)]
struct PostCategoryDao {
    db: DatabaseConnection,
}

impl DaoBase for PostCategoryDao {
    type Entity = PostCategory;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub post_type: String,
    pub author_id: Uuid,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub post_type: Option<String>,
    pub category_id: Option<Uuid>,
    pub title_contains: Option<String>,
    pub include_drafts: bool,
}

impl PostDao {
    fn category_dao(&self) -> PostCategoryDao {
        PostCategoryDao::new(&self.db)
    }

    pub async fn create_post(&self, new_post: NewPost) -> DaoResult<post::Model> {
        let model = post::ActiveModel {
            slug: Set(new_post.slug),
            title: Set(new_post.title),
            content: Set(new_post.content),
            excerpt: Set(new_post.excerpt),
            post_type: Set(new_post.post_type),
            author_id: Set(new_post.author_id),
            thumbnail_url: Set(new_post.thumbnail_url),
            published_at: Set(new_post.published_at),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> DaoResult<Option<post::Model>> {
        let slug = slug.to_string();
        self.find_one(move |query| query.filter(post::Column::Slug.eq(slug)))
            .await
    }

    /// Slugs equal to `base` or starting with `base-`, used to pick a free suffix.
    pub async fn slugs_with_prefix(&self, base: &str) -> DaoResult<Vec<String>> {
        let exact = base.to_string();
        let prefix = format!("{base}-");
        let rows = self
            .find_all(None, move |query| {
                query.filter(
                    Condition::any()
                        .add(post::Column::Slug.eq(exact))
                        .add(post::Column::Slug.starts_with(prefix)),
                )
            })
            .await?;
        Ok(rows.into_iter().map(|row| row.slug).collect())
    }

    pub async fn list(
        &self,
        params: PageParams,
        filter: PostFilter,
    ) -> DaoResult<PaginatedResponse<post::Model>> {
        self.find_page(params, None, move |query| apply_filter(query, filter))
            .await
    }

    pub async fn find_by_ids(&self, ids: Vec<Uuid>) -> DaoResult<Vec<post::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_all(None, move |query| query.filter(post::Column::Id.is_in(ids)))
            .await
    }

    pub async fn count_by_type(&self, post_type: &str) -> DaoResult<u64> {
        let post_type = post_type.to_string();
        self.count(move |query| query.filter(post::Column::PostType.eq(post_type)))
            .await
    }

    pub async fn category_ids(&self, post_id: Uuid) -> DaoResult<Vec<Uuid>> {
        let rows = self
            .category_dao()
            .find_all(None, move |query| {
                query.filter(post_category::Column::PostId.eq(post_id))
            })
            .await?;
        Ok(rows.into_iter().map(|row| row.category_id).collect())
    }

    /// Replaces the category links of a post.
    pub async fn set_categories(&self, post_id: Uuid, category_ids: &[Uuid]) -> DaoResult<()> {
        PostCategory::delete_many()
            .filter(post_category::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;

        let links = self.category_dao();
        for category_id in category_ids {
            links
                .create(post_category::ActiveModel {
                    post_id: Set(post_id),
                    category_id: Set(*category_id),
                    ..Default::default()
                })
                .await?;
        }
        Ok(())
    }
}

fn apply_filter(query: sea_orm::Select<Post>, filter: PostFilter) -> sea_orm::Select<Post> {
    let mut query = query;
    if !filter.include_drafts {
        query = query.filter(post::Column::PublishedAt.is_not_null());
    }
    if let Some(post_type) = filter.post_type {
        query = query.filter(post::Column::PostType.eq(post_type));
    }
    if let Some(needle) = filter.title_contains {
        query = query.filter(post::Column::Title.contains(needle));
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(
            post::Column::Id.in_subquery(
                Query::select()
                    .column(post_category::Column::PostId)
                    .from(PostCategory)
                    .and_where(post_category::Column::CategoryId.eq(category_id))
                    .to_owned(),
            ),
        );
    }
    query
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::{PostDao, PostFilter};
    use crate::db::dao::{DaoBase, DaoLayerError, PageParams};
    use crate::db::entities::post_category;
    use crate::test_helpers::{post_model, ts};

    #[tokio::test]
    async fn slugs_with_prefix_collects_slugs() {
        let author = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                post_model(author, "masjid-istiqlal", "masjid"),
                post_model(author, "masjid-istiqlal-2", "masjid"),
            ]])
            .into_connection();
        let dao = PostDao::new(&db);

        let slugs = dao
            .slugs_with_prefix("masjid-istiqlal")
            .await
            .expect("query should succeed");
        assert_eq!(slugs, vec!["masjid-istiqlal", "masjid-istiqlal-2"]);
    }

    #[tokio::test]
    async fn list_reports_next_page() {
        let author = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                post_model(author, "a", "artikel"),
                post_model(author, "b", "artikel"),
            ]])
            .into_connection();
        let dao = PostDao::new(&db);

        let page = dao
            .list(
                PageParams {
                    page: Some(1),
                    page_size: Some(1),
                },
                PostFilter::default(),
            )
            .await
            .expect("query should succeed");
        assert_eq!(page.data.len(), 1);
        assert!(page.has_next);
    }

    #[tokio::test]
    async fn list_rejects_oversized_pages() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let dao = PostDao::new(&db);

        let err = dao
            .list(
                PageParams {
                    page: Some(1),
                    page_size: Some(1_000),
                },
                PostFilter::default(),
            )
            .await
            .expect_err("page size should be rejected");
        assert!(matches!(err, DaoLayerError::InvalidPagination { .. }));
    }

    #[tokio::test]
    async fn find_by_ids_skips_query_for_empty_input() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let dao = PostDao::new(&db);

        let posts = dao.find_by_ids(Vec::new()).await.expect("no query needed");
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn set_categories_replaces_links() {
        let post_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let link = post_category::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            post_id,
            category_id,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .append_query_results([[link]])
            .into_connection();
        let dao = PostDao::new(&db);

        dao.set_categories(post_id, &[category_id])
            .await
            .expect("links should be replaced");
    }

    #[tokio::test]
    async fn category_ids_maps_links() {
        let post_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post_category::Model {
                id: Uuid::new_v4(),
                created_at: ts(),
                updated_at: ts(),
                post_id,
                category_id,
            }]])
            .into_connection();
        let dao = PostDao::new(&db);

        let ids = dao.category_ids(post_id).await.expect("query should succeed");
        assert_eq!(ids, vec![category_id]);
    }
}
