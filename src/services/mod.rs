pub mod admin_service;
pub mod announcement_service;
pub mod auth_service;
pub mod bookmark_service;
pub mod category_service;
pub mod comment_service;
pub mod context;
pub mod history_service;
pub mod image_service;
pub mod masjid_service;
pub mod post_service;
pub mod session_service;
pub mod user_service;

pub use context::ServiceContext;
