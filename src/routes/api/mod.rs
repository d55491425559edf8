pub mod admin;
pub mod announcements;
pub mod auth;
pub mod bookmarks;
pub mod categories;
pub mod comments;
pub mod history;
pub mod images;
pub mod masjids;
pub mod meta;
pub mod posts;
mod router;
pub mod users;

pub use router::router;

use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::error::AppError;

/// Tells an absent field (`None`) apart from an explicit `null` (`Some(None)`).
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn validated<T: Validate>(body: T) -> Result<T, AppError> {
    body.validate()?;
    Ok(body)
}
