use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::classification_records::Entity")]
    ClassificationRecords,
}

impl Related<super::classification_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassificationRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
