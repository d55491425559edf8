use std::collections::HashMap;

use sea_orm::Set;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::Claims,
    db::dao::{DaoBase, DaoContext, MasjidProfile, PageParams, PaginatedResponse, PostFilter},
    db::entities::masjid,
    error::AppError,
    services::post_service::{PostInput, PostService, PostSummary, PostType, PostUpdate, visible_to},
};

#[derive(Debug, Clone, Serialize)]
pub struct MasjidView {
    pub post: PostSummary,
    pub profile: Option<masjid::Model>,
}

#[derive(Debug, Clone)]
pub struct MasjidInput {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category_ids: Vec<Uuid>,
    pub publish: bool,
    pub profile: MasjidProfile,
}

#[derive(Debug, Clone, Default)]
pub struct MasjidProfileUpdate {
    pub location: Option<String>,
    pub architect: Option<Option<String>>,
    pub year_built: Option<Option<i32>>,
    pub style: Option<Option<String>>,
    pub map_url: Option<Option<String>>,
    pub capacity: Option<Option<i32>>,
}

#[derive(Debug, Clone, Default)]
pub struct MasjidUpdate {
    pub post: PostUpdate,
    pub profile: MasjidProfileUpdate,
}

fn not_found() -> AppError {
    AppError::not_found("Masjid tidak ditemukan")
}

/// Masjid records are `masjid` posts plus a one-to-one profile row.
#[derive(Clone)]
pub struct MasjidService {
    daos: DaoContext,
    posts: PostService,
}

impl MasjidService {
    pub fn new(daos: DaoContext) -> Self {
        Self {
            posts: PostService::new(daos.clone()),
            daos,
        }
    }

    pub async fn list(&self, params: PageParams) -> Result<PaginatedResponse<MasjidView>, AppError> {
        let page = self
            .daos
            .post()
            .list(
                params,
                PostFilter {
                    post_type: Some(PostType::Masjid.as_str().to_string()),
                    ..PostFilter::default()
                },
            )
            .await?;
        let post_ids = page.data.iter().map(|post| post.id).collect();
        let mut profiles: HashMap<Uuid, masjid::Model> = self
            .daos
            .masjid()
            .find_by_post_ids(post_ids)
            .await?
            .into_iter()
            .map(|profile| (profile.post_id, profile))
            .collect();

        Ok(page.map(|post| MasjidView {
            profile: profiles.remove(&post.id),
            post: post.into(),
        }))
    }

    async fn masjid_post(&self, post_id: Uuid) -> Result<crate::db::entities::post::Model, AppError> {
        let post = self.daos.post().find_by_id(post_id).await.map_err(|_| not_found())?;
        if post.post_type != PostType::Masjid.as_str() {
            return Err(not_found());
        }
        Ok(post)
    }

    pub async fn get(&self, post_id: Uuid, viewer: Option<&Claims>) -> Result<MasjidView, AppError> {
        let post = self.masjid_post(post_id).await?;
        if !visible_to(&post, viewer) {
            return Err(not_found());
        }
        let profile = self.daos.masjid().find_by_post_id(post_id).await?;
        Ok(MasjidView {
            post: post.into(),
            profile,
        })
    }

    /// Post first, then its profile; not wrapped in a transaction.
    pub async fn create(&self, author_id: Uuid, input: MasjidInput) -> Result<MasjidView, AppError> {
        if input.profile.location.trim().is_empty() {
            return Err(AppError::bad_request("Lokasi tidak boleh kosong"));
        }
        let post = self
            .posts
            .create(
                author_id,
                PostInput {
                    title: input.title,
                    content: input.content,
                    post_type: PostType::Masjid,
                    excerpt: input.excerpt,
                    thumbnail_url: input.thumbnail_url,
                    category_ids: input.category_ids,
                    publish: input.publish,
                },
            )
            .await?;
        let profile = self.daos.masjid().create_profile(post.id, input.profile).await?;
        Ok(MasjidView {
            post: post.into(),
            profile: Some(profile),
        })
    }

    pub async fn update(&self, post_id: Uuid, update: MasjidUpdate) -> Result<MasjidView, AppError> {
        self.masjid_post(post_id).await?;
        let post = self.posts.update(post_id, update.post).await?;

        let changes = update.profile;
        let masjids = self.daos.masjid();
        let profile = match masjids.find_by_post_id(post_id).await? {
            Some(existing) => {
                if changes
                    .location
                    .as_deref()
                    .is_some_and(|location| location.trim().is_empty())
                {
                    return Err(AppError::bad_request("Lokasi tidak boleh kosong"));
                }
                masjids
                    .update(existing.id, move |active: &mut masjid::ActiveModel| {
                        if let Some(location) = changes.location {
                            active.location = Set(location.trim().to_string());
                        }
                        if let Some(architect) = changes.architect {
                            active.architect = Set(architect);
                        }
                        if let Some(year_built) = changes.year_built {
                            active.year_built = Set(year_built);
                        }
                        if let Some(style) = changes.style {
                            active.style = Set(style);
                        }
                        if let Some(map_url) = changes.map_url {
                            active.map_url = Set(map_url);
                        }
                        if let Some(capacity) = changes.capacity {
                            active.capacity = Set(capacity);
                        }
                    })
                    .await?
            }
            None => {
                let location = changes
                    .location
                    .filter(|location| !location.trim().is_empty())
                    .ok_or_else(|| AppError::bad_request("Lokasi tidak boleh kosong"))?;
                masjids
                    .create_profile(
                        post_id,
                        MasjidProfile {
                            location,
                            architect: changes.architect.flatten(),
                            year_built: changes.year_built.flatten(),
                            style: changes.style.flatten(),
                            map_url: changes.map_url.flatten(),
                            capacity: changes.capacity.flatten(),
                        },
                    )
                    .await?
            }
        };

        Ok(MasjidView {
            post: post.into(),
            profile: Some(profile),
        })
    }

    /// The profile row goes with the post through the cascade.
    pub async fn delete(&self, post_id: Uuid, actor: &Claims) -> Result<(), AppError> {
        self.masjid_post(post_id).await?;
        self.posts.delete(post_id, actor).await
    }
}
