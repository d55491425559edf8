#[allow(unused_imports)]
pub mod prelude {
    pub use super::announcement::Entity as Announcement;
    pub use super::bookmark::Entity as Bookmark;
    pub use super::category::Entity as Category;
    pub use super::comment::Entity as Comment;
    pub use super::history::Entity as History;
    pub use super::image::Entity as Image;
    pub use super::masjid::Entity as Masjid;
    pub use super::otp_verification::Entity as OtpVerification;
    pub use super::post::Entity as Post;
    pub use super::post_category::Entity as PostCategory;
    pub use super::session::Entity as Session;
    pub use super::user::Entity as User;
}

pub mod announcement;
pub mod bookmark;
pub mod category;
pub mod comment;
pub mod history;
pub mod image;
pub mod masjid;
pub mod otp_verification;
pub mod post;
pub mod post_category;
pub mod session;
pub mod user;
