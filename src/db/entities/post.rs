use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(label = "Postingan")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    /// `masjid` or `artikel`.
    #[sea_orm(indexed)]
    pub post_type: String,
    #[sea_orm(indexed)]
    pub author_id: Uuid,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(belongs_to, from = "author_id", to = "id", on_delete = "Cascade")]
    pub author: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
