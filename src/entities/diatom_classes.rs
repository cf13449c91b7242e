use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "diatom_classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Join key against predicted class names, not an opaque id.
    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub scientific_description: String,

    #[sea_orm(column_type = "Text")]
    pub environmental_significance: String,

    #[sea_orm(column_type = "Text")]
    pub impacts: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
