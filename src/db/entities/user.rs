use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(label = "Pengguna")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(unique)]
    pub email: String,
    /// `None` for accounts created through Google that never set a password.
    pub password_hash: Option<String>,
    pub fullname: String,
    #[sea_orm(indexed)]
    pub role: String,
    #[sea_orm(default_value = false)]
    pub is_verified: bool,
    #[sea_orm(default_value = false)]
    pub has_google_account: bool,
    pub avatar_url: Option<String>,
    #[sea_orm(has_many)]
    pub sessions: HasMany<super::session::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
