use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};
use heck::ToKebabCase;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{Claims, Role},
    db::dao::{DaoBase, DaoContext, NewPost, PageParams, PaginatedResponse, PostFilter},
    db::entities::{category, image, masjid, post},
    error::AppError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Masjid,
    Artikel,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Masjid => "masjid",
            PostType::Artikel => "artikel",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub post_type: String,
    pub author_id: Uuid,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<post::Model> for PostSummary {
    fn from(post: post::Model) -> Self {
        Self {
            id: post.id,
            slug: post.slug,
            title: post.title,
            excerpt: post.excerpt,
            post_type: post.post_type,
            author_id: post.author_id,
            thumbnail_url: post.thumbnail_url,
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostSummary,
    pub content: String,
    pub author_name: String,
    pub categories: Vec<category::Model>,
    pub images: Vec<image::Model>,
    pub masjid: Option<masjid::Model>,
}

#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub post_type: Option<PostType>,
    pub category_slug: Option<String>,
    pub q: Option<String>,
    pub include_drafts: bool,
}

#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub post_type: PostType,
    pub excerpt: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category_ids: Vec<Uuid>,
    pub publish: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub thumbnail_url: Option<Option<String>>,
    pub category_ids: Option<Vec<Uuid>>,
    pub publish: Option<bool>,
}

/// Kebab-case ASCII slug; falls back to `post` when nothing usable remains.
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .to_kebab_case()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}

/// `base` if free, otherwise `base-N` with the next unused N (from 2).
pub fn unique_slug(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|slug| slug == base) {
        return base.to_string();
    }
    let prefix = format!("{base}-");
    let used: HashSet<u64> = taken
        .iter()
        .filter_map(|slug| slug.strip_prefix(&prefix))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .collect();
    // One past the largest suffix; the lowest free one once that would overflow.
    let next = match used.iter().max() {
        None => 2,
        Some(highest) => match highest.checked_add(1) {
            Some(next) => next.max(2),
            None => (2..).find(|n| !used.contains(n)).unwrap_or(2),
        },
    };
    format!("{base}-{next}")
}

/// Drafts exist only for editors and above.
pub(crate) fn visible_to(post: &post::Model, viewer: Option<&Claims>) -> bool {
    post.published_at.is_some() || viewer.is_some_and(|claims| claims.role.satisfies(Role::Editor))
}

fn not_found() -> AppError {
    AppError::not_found("Postingan tidak ditemukan")
}

fn require_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(format!("{field} tidak boleh kosong")));
    }
    Ok(trimmed.to_string())
}

#[derive(Clone)]
pub struct PostService {
    daos: DaoContext,
}

impl PostService {
    pub fn new(daos: DaoContext) -> Self {
        Self { daos }
    }

    /// Drafts are only listed for editors and above who ask for them.
    pub async fn list(
        &self,
        params: PageParams,
        query: PostQuery,
        viewer_role: Option<Role>,
    ) -> Result<PaginatedResponse<PostSummary>, AppError> {
        let category_id = match query.category_slug.as_deref() {
            Some(slug) => match self.daos.category().find_by_slug(slug).await? {
                Some(category) => Some(category.id),
                None => {
                    return Ok(PaginatedResponse {
                        data: Vec::new(),
                        page: params.page(),
                        page_size: params.page_size(),
                        has_next: false,
                        total: Some(0),
                    });
                }
            },
            None => None,
        };
        let include_drafts =
            query.include_drafts && viewer_role.is_some_and(|role| role.satisfies(Role::Editor));

        let filter = PostFilter {
            post_type: query.post_type.map(|t| t.as_str().to_string()),
            category_id,
            title_contains: query.q.filter(|q| !q.trim().is_empty()),
            include_drafts,
        };
        Ok(self.daos.post().list(params, filter).await?.map(PostSummary::from))
    }

    pub async fn find_post(&self, id: Uuid) -> Result<post::Model, AppError> {
        self.daos.post().find_by_id(id).await.map_err(|_| not_found())
    }

    pub async fn get_by_slug(&self, slug: &str, viewer: Option<&Claims>) -> Result<PostDetail, AppError> {
        let post = self
            .daos
            .post()
            .find_by_slug(slug)
            .await?
            .ok_or_else(not_found)?;
        if !visible_to(&post, viewer) {
            return Err(not_found());
        }

        if let Some(claims) = viewer {
            let user_id = claims.user_id()?;
            if let Err(err) = self
                .daos
                .history()
                .record_view(user_id, post.id, Utc::now().fixed_offset())
                .await
            {
                tracing::warn!(error = %err, post_id = %post.id, "failed to record reading history");
            }
        }

        self.detail(post).await
    }

    pub async fn detail(&self, post: post::Model) -> Result<PostDetail, AppError> {
        let author_name = match self.daos.user().find_by_id(post.author_id).await {
            Ok(author) => author.fullname,
            Err(_) => "Anonim".to_string(),
        };
        let category_ids = self.daos.post().category_ids(post.id).await?;
        let categories = self.daos.category().find_by_ids(category_ids).await?;
        let images = self.daos.image().list_for_post(post.id).await?;
        let masjid = if post.post_type == PostType::Masjid.as_str() {
            self.daos.masjid().find_by_post_id(post.id).await?
        } else {
            None
        };

        Ok(PostDetail {
            content: post.content.clone(),
            post: post.into(),
            author_name,
            categories,
            images,
            masjid,
        })
    }

    /// Distinct ids in request order, once every one is known to exist.
    async fn check_categories(&self, category_ids: &[Uuid]) -> Result<Vec<Uuid>, AppError> {
        let mut seen = HashSet::new();
        let wanted: Vec<Uuid> = category_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        if wanted.is_empty() {
            return Ok(wanted);
        }
        let found = self.daos.category().find_by_ids(wanted.clone()).await?;
        if found.len() != wanted.len() {
            return Err(AppError::bad_request("Kategori tidak ditemukan"));
        }
        Ok(wanted)
    }

    pub async fn create(&self, author_id: Uuid, input: PostInput) -> Result<post::Model, AppError> {
        let title = require_text(&input.title, "Judul")?;
        let content = require_text(&input.content, "Konten")?;
        let category_ids = self.check_categories(&input.category_ids).await?;

        let posts = self.daos.post();
        let base = slugify(&title);
        let slug = unique_slug(&base, &posts.slugs_with_prefix(&base).await?);
        let post = posts
            .create_post(NewPost {
                slug,
                title,
                content,
                excerpt: input.excerpt.filter(|e| !e.trim().is_empty()),
                post_type: input.post_type.as_str().to_string(),
                author_id,
                thumbnail_url: input.thumbnail_url,
                published_at: input.publish.then(|| Utc::now().fixed_offset()),
            })
            .await?;
        if !category_ids.is_empty() {
            posts.set_categories(post.id, &category_ids).await?;
        }
        tracing::info!(post_id = %post.id, slug = %post.slug, post_type = %post.post_type, "post created");
        Ok(post)
    }

    /// The slug stays fixed so shared links keep working.
    pub async fn update(&self, id: Uuid, update: PostUpdate) -> Result<post::Model, AppError> {
        let current = self.find_post(id).await?;
        let title = update
            .title
            .as_deref()
            .map(|title| require_text(title, "Judul"))
            .transpose()?;
        let content = update
            .content
            .as_deref()
            .map(|content| require_text(content, "Konten"))
            .transpose()?;
        let category_ids = match update.category_ids.as_deref() {
            Some(ids) => Some(self.check_categories(ids).await?),
            None => None,
        };
        let published_at = match update.publish {
            Some(true) => Some(current.published_at.or_else(|| Some(Utc::now().fixed_offset()))),
            Some(false) => Some(None),
            None => None,
        };

        let excerpt = update.excerpt;
        let thumbnail_url = update.thumbnail_url;
        let post = self
            .daos
            .post()
            .update(id, move |active: &mut post::ActiveModel| {
                if let Some(title) = title {
                    active.title = Set(title);
                }
                if let Some(content) = content {
                    active.content = Set(content);
                }
                if let Some(excerpt) = excerpt {
                    active.excerpt = Set(excerpt);
                }
                if let Some(thumbnail_url) = thumbnail_url {
                    active.thumbnail_url = Set(thumbnail_url);
                }
                if let Some(published_at) = published_at {
                    active.published_at = Set(published_at);
                }
            })
            .await?;

        if let Some(category_ids) = category_ids {
            self.daos.post().set_categories(id, &category_ids).await?;
        }
        Ok(post)
    }

    /// Editors may delete their own posts; admins any.
    pub async fn delete(&self, id: Uuid, actor: &Claims) -> Result<(), AppError> {
        let post = self.find_post(id).await?;
        if !actor.role.satisfies(Role::Admin) && post.author_id != actor.user_id()? {
            return Err(AppError::forbidden("Anda hanya dapat menghapus postingan sendiri"));
        }
        self.daos.post().delete(id).await?;
        tracing::info!(post_id = %id, "post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::{PostInput, PostQuery, PostService, PostType, slugify, unique_slug};
    use crate::{
        auth::{Claims, Role},
        db::dao::{DaoContext, PageParams},
        db::entities::{category, image, post_category},
        error::AppError,
        test_helpers::{category_model, masjid_model, post_model, user_model},
    };

    fn service(db: MockDatabase) -> PostService {
        PostService::new(DaoContext::new(&db.into_connection()))
    }

    fn claims(user_id: Uuid, role: Role) -> Claims {
        Claims {
            sub: user_id.to_string(),
            email: "tester@masjid.id".to_string(),
            role,
            iat: 0,
            exp: usize::MAX,
        }
    }

    fn input(title: &str) -> PostInput {
        PostInput {
            title: title.to_string(),
            content: "<p>Sejarah</p>".to_string(),
            post_type: PostType::Artikel,
            excerpt: None,
            thumbnail_url: None,
            category_ids: Vec::new(),
            publish: true,
        }
    }

    #[test]
    fn slugify_produces_kebab_ascii() {
        assert_eq!(slugify("Masjid Istiqlal Jakarta"), "masjid-istiqlal-jakarta");
        assert_eq!(slugify("Sejarah & Arsitektur!"), "sejarah-arsitektur");
        assert_eq!(slugify("???"), "post");
    }

    #[test]
    fn unique_slug_appends_next_free_suffix() {
        assert_eq!(unique_slug("masjid", &[]), "masjid");
        assert_eq!(unique_slug("masjid", &["masjid".to_string()]), "masjid-2");
        assert_eq!(
            unique_slug(
                "masjid",
                &["masjid".to_string(), "masjid-2".to_string(), "masjid-7".to_string()]
            ),
            "masjid-8"
        );
        assert_eq!(
            unique_slug("masjid", &["masjid-agung".to_string()]),
            "masjid"
        );
    }

    #[test]
    fn unique_slug_survives_huge_suffixes() {
        assert_eq!(
            unique_slug(
                "masjid",
                &["masjid".to_string(), "masjid-4294967295".to_string()]
            ),
            "masjid-4294967296"
        );
        assert_eq!(
            unique_slug(
                "masjid",
                &[
                    "masjid".to_string(),
                    "masjid-2".to_string(),
                    format!("masjid-{}", u64::MAX),
                ]
            ),
            "masjid-3"
        );
    }

    #[tokio::test]
    async fn create_dedupes_slug() {
        let author = Uuid::new_v4();
        let existing = post_model(author, "masjid-kubah-emas", "artikel");
        let created = post_model(author, "masjid-kubah-emas-2", "artikel");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .append_query_results([[created]]);

        let post = service(db)
            .create(author, input("Masjid Kubah Emas"))
            .await
            .expect("create should succeed");
        assert_eq!(post.slug, "masjid-kubah-emas-2");
    }

    #[tokio::test]
    async fn create_rejects_unknown_categories() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()]);
        let mut input = input("Judul");
        input.category_ids = vec![Uuid::new_v4()];

        let err = service(db)
            .create(Uuid::new_v4(), input)
            .await
            .expect_err("unknown category should fail");
        assert_eq!(err.message(), "Kategori tidak ditemukan");
    }

    #[tokio::test]
    async fn create_accepts_repeated_category_ids_once() {
        let author = Uuid::new_v4();
        let category = category_model("Sejarah", "sejarah");
        let created = post_model(author, "judul", "artikel");
        let link = post_category::Model {
            id: Uuid::new_v4(),
            created_at: created.created_at,
            updated_at: created.created_at,
            post_id: created.id,
            category_id: category.id,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[category.clone()]])
            .append_query_results([Vec::<crate::db::entities::post::Model>::new()])
            .append_query_results([[created.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([[link]]);
        let mut input = input("Judul");
        input.category_ids = vec![category.id, category.id];

        let post = service(db)
            .create(author, input)
            .await
            .expect("a repeated category is still a known category");
        assert_eq!(post.id, created.id);
    }

    #[tokio::test]
    async fn create_requires_title() {
        let err = service(MockDatabase::new(DatabaseBackend::Postgres))
            .create(Uuid::new_v4(), input("  "))
            .await
            .expect_err("blank title should fail");
        assert_eq!(err.message(), "Judul tidak boleh kosong");
    }

    #[tokio::test]
    async fn list_with_unknown_category_is_empty_without_querying_posts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()]);

        let page = service(db)
            .list(
                PageParams::default(),
                PostQuery {
                    category_slug: Some("tidak-ada".to_string()),
                    ..PostQuery::default()
                },
                None,
            )
            .await
            .expect("list should succeed");
        assert!(page.data.is_empty());
        assert_eq!(page.total, Some(0));
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_readers() {
        let mut draft = post_model(Uuid::new_v4(), "draft", "artikel");
        draft.published_at = None;
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[draft]]);

        let err = service(db)
            .get_by_slug("draft", None)
            .await
            .expect_err("draft should be hidden");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn detail_collects_author_categories_images_and_profile() {
        let author = user_model(Uuid::new_v4(), "imam@masjid.id", Role::Editor);
        let post = post_model(author.id, "masjid-raya", "masjid");
        let category = category_model("Sejarah", "sejarah");
        let link = post_category::Model {
            id: Uuid::new_v4(),
            created_at: post.created_at,
            updated_at: post.created_at,
            post_id: post.id,
            category_id: category.id,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post.clone()]])
            .append_query_results([[author.clone()]])
            .append_query_results([[link]])
            .append_query_results([[category]])
            .append_query_results([Vec::<image::Model>::new()])
            .append_query_results([[masjid_model(post.id, "Padang")]]);

        let detail = service(db)
            .get_by_slug("masjid-raya", None)
            .await
            .expect("detail should load");
        assert_eq!(detail.author_name, author.fullname);
        assert_eq!(detail.categories.len(), 1);
        assert_eq!(detail.masjid.map(|m| m.location), Some("Padang".to_string()));
    }

    #[tokio::test]
    async fn editor_cannot_delete_someone_elses_post() {
        let post = post_model(Uuid::new_v4(), "milik-orang", "artikel");
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[post.clone()]]);

        let err = service(db)
            .delete(post.id, &claims(Uuid::new_v4(), Role::Editor))
            .await
            .expect_err("foreign post should be protected");
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn admin_deletes_any_post() {
        let post = post_model(Uuid::new_v4(), "milik-orang", "artikel");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]);

        service(db)
            .delete(post.id, &claims(Uuid::new_v4(), Role::Admin))
            .await
            .expect("admin delete should succeed");
    }

    #[tokio::test]
    async fn update_keeps_slug() {
        let post = post_model(Uuid::new_v4(), "judul-lama", "artikel");
        let mut updated = post.clone();
        updated.title = "Judul Baru".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post.clone()]])
            .append_query_results([[post.clone()]])
            .append_query_results([[updated]]);

        let result = service(db)
            .update(
                post.id,
                super::PostUpdate {
                    title: Some("Judul Baru".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update should succeed");
        assert_eq!(result.slug, "judul-lama");
        assert_eq!(result.title, "Judul Baru");
    }
}
