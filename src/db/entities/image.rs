use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(label = "Gambar")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(indexed)]
    pub post_id: Uuid,
    pub url: String,
    /// Object key inside the storage backend.
    pub storage_key: String,
    pub content_type: String,
    pub caption: Option<String>,
    #[sea_orm(belongs_to, from = "post_id", to = "id", on_delete = "Cascade")]
    pub post: HasOne<super::post::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
