use sea_orm::DatabaseConnection;

use super::{
    AnnouncementDao, BookmarkDao, CategoryDao, CommentDao, DaoBase, HistoryDao, ImageDao,
    MaintenanceDao, MasjidDao, OtpDao, PostDao, SessionDao, UserDao,
};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn otp(&self) -> OtpDao {
        DaoBase::new(&self.db)
    }

    pub fn session(&self) -> SessionDao {
        DaoBase::new(&self.db)
    }

    pub fn post(&self) -> PostDao {
        DaoBase::new(&self.db)
    }

    pub fn masjid(&self) -> MasjidDao {
        DaoBase::new(&self.db)
    }

    pub fn comment(&self) -> CommentDao {
        DaoBase::new(&self.db)
    }

    pub fn image(&self) -> ImageDao {
        DaoBase::new(&self.db)
    }

    pub fn bookmark(&self) -> BookmarkDao {
        DaoBase::new(&self.db)
    }

    pub fn history(&self) -> HistoryDao {
        DaoBase::new(&self.db)
    }

    pub fn category(&self) -> CategoryDao {
        DaoBase::new(&self.db)
    }

    pub fn announcement(&self) -> AnnouncementDao {
        DaoBase::new(&self.db)
    }

    pub fn maintenance(&self) -> MaintenanceDao {
        MaintenanceDao::new(&self.db)
    }
}
