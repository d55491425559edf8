use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(label = "Kategori")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}
