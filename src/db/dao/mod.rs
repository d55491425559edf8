pub mod announcement_dao;
pub mod base;
pub mod base_traits;
pub mod bookmark_dao;
pub mod category_dao;
pub mod comment_dao;
mod context;
pub mod error;
pub mod history_dao;
pub mod image_dao;
pub mod maintenance_dao;
pub mod masjid_dao;
pub mod otp_dao;
pub mod post_dao;
pub mod session_dao;
pub mod user_dao;

pub use announcement_dao::AnnouncementDao;
pub use base::{DEFAULT_PAGE_SIZE, DaoBase, PageParams, PaginatedResponse};
pub use base_traits::{EntityLabel, HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};
pub use bookmark_dao::BookmarkDao;
pub use category_dao::CategoryDao;
pub use comment_dao::CommentDao;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use history_dao::HistoryDao;
pub use image_dao::{ImageDao, NewImage};
pub use maintenance_dao::{ClearReport, MaintenanceDao};
pub use masjid_dao::{MasjidDao, MasjidProfile};
pub use otp_dao::OtpDao;
pub use post_dao::{NewPost, PostDao, PostFilter};
pub use session_dao::SessionDao;
pub use user_dao::{NewUser, UserDao, UserListFilter};
