use sea_orm::DatabaseConnection;

use crate::{
    db::dao::DaoContext,
    services::{
        admin_service::AdminService, announcement_service::AnnouncementService,
        auth_service::AuthService, bookmark_service::BookmarkService,
        category_service::CategoryService, comment_service::CommentService,
        history_service::HistoryService, image_service::ImageService,
        masjid_service::MasjidService, post_service::PostService,
        user_service::UserService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn auth<'a>(&self, state: &'a AppState) -> AuthService<'a> {
        AuthService::new(state)
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn post(&self) -> PostService {
        PostService::new(self.daos.clone())
    }

    pub fn masjid(&self) -> MasjidService {
        MasjidService::new(self.daos.clone())
    }

    pub fn comment(&self) -> CommentService {
        CommentService::new(self.daos.clone())
    }

    pub fn bookmark(&self) -> BookmarkService {
        BookmarkService::new(self.daos.clone())
    }

    pub fn history(&self) -> HistoryService {
        HistoryService::new(self.daos.clone())
    }

    pub fn image(&self, state: &AppState) -> ImageService {
        ImageService::new(
            self.daos.clone(),
            state.storage.clone(),
            state.config.storage.max_upload_bytes,
        )
    }

    pub fn category(&self) -> CategoryService {
        CategoryService::new(self.daos.clone())
    }

    pub fn announcement(&self) -> AnnouncementService {
        AnnouncementService::new(self.daos.clone())
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(self.daos.clone())
    }
}
