use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(label = "Kode OTP")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "otp_verifications")]
pub struct Model {
    #[sea_orm(indexed)]
    pub user_id: Uuid,
    #[sea_orm(indexed)]
    pub code: String,
    pub purpose: String,
    pub expires_at: DateTimeWithTimeZone,
    #[sea_orm(default_value = false)]
    pub is_used: bool,
    #[sea_orm(default_value = 0)]
    pub attempts: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
