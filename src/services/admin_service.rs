use serde::Serialize;

use crate::{
    db::dao::{ClearReport, DaoBase, DaoContext},
    error::AppError,
    services::post_service::PostType,
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub users: u64,
    pub masjid_posts: u64,
    pub article_posts: u64,
    pub comments: u64,
    pub categories: u64,
}

#[derive(Clone)]
pub struct AdminService {
    daos: DaoContext,
}

impl AdminService {
    pub fn new(daos: DaoContext) -> Self {
        Self { daos }
    }

    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let posts = self.daos.post();
        Ok(DashboardStats {
            users: self.daos.user().count(|query| query).await?,
            masjid_posts: posts.count_by_type(PostType::Masjid.as_str()).await?,
            article_posts: posts.count_by_type(PostType::Artikel.as_str()).await?,
            comments: self.daos.comment().count(|query| query).await?,
            categories: self.daos.category().count(|query| query).await?,
        })
    }

    pub async fn clear_database(&self) -> Result<ClearReport, AppError> {
        let report = self.daos.maintenance().clear_database().await?;
        tracing::warn!(
            posts = report.posts,
            users = report.users,
            categories = report.categories,
            announcements = report.announcements,
            "database cleared"
        );
        Ok(report)
    }
}
