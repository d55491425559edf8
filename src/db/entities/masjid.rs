use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(label = "Masjid")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "masjids")]
pub struct Model {
    #[sea_orm(unique)]
    pub post_id: Uuid,
    pub location: String,
    pub architect: Option<String>,
    pub year_built: Option<i32>,
    pub style: Option<String>,
    pub map_url: Option<String>,
    pub capacity: Option<i32>,
    #[sea_orm(belongs_to, from = "post_id", to = "id", on_delete = "Cascade")]
    pub post: HasOne<super::post::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
