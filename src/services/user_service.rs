use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::Role,
    db::dao::{DaoBase, PageParams, PaginatedResponse, UserDao, UserListFilter},
    db::entities::user,
    error::AppError,
};

/// Public shape of an account; never carries the password hash.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
    pub role: String,
    pub is_verified: bool,
    pub has_google_account: bool,
    pub has_password: bool,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserView {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            has_password: user.password_hash.is_some(),
            email: user.email,
            fullname: user.fullname,
            role: user.role,
            is_verified: user.is_verified,
            has_google_account: user.has_google_account,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

/// Stored role text, falling back to the lowest role for unknown values.
pub fn role_of(user: &user::Model) -> Role {
    Role::try_from(user.role.as_str()).unwrap_or_else(|_| {
        tracing::warn!(user_id = %user.id, role = %user.role, "unknown stored role");
        Role::Viewer
    })
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub fullname: Option<String>,
    /// `Some(None)` clears the avatar.
    pub avatar_url: Option<Option<String>>,
}

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn get(&self, id: Uuid) -> Result<UserView, AppError> {
        Ok(self.user_dao.find_by_id(id).await?.into())
    }

    pub async fn list(
        &self,
        params: PageParams,
        filter: UserListFilter,
    ) -> Result<PaginatedResponse<UserView>, AppError> {
        Ok(self.user_dao.list(params, filter).await?.map(UserView::from))
    }

    pub async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<UserView, AppError> {
        let fullname = match update.fullname {
            Some(name) if name.trim().is_empty() => {
                return Err(AppError::bad_request("Nama lengkap tidak boleh kosong"));
            }
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };
        let avatar_url = update
            .avatar_url
            .map(|url| url.filter(|url| !url.trim().is_empty()));
        Ok(self
            .user_dao
            .update_profile(id, fullname, avatar_url)
            .await?
            .into())
    }

    /// Super admins may not demote themselves, so one always remains.
    pub async fn set_role(&self, actor_id: Uuid, target_id: Uuid, role: Role) -> Result<UserView, AppError> {
        if actor_id == target_id && role != Role::SuperAdmin {
            return Err(AppError::bad_request(
                "Super admin tidak dapat menurunkan perannya sendiri",
            ));
        }
        let updated = self.user_dao.set_role(target_id, role).await?;
        tracing::info!(%actor_id, %target_id, role = role.as_str(), "user role changed");
        Ok(updated.into())
    }
}
