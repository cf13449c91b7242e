use sea_orm::entity::prelude::*;

/// One classification event. Rows are append-only: created exactly once per
/// successful (or fallback-successful) submission, never updated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classification_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    #[sea_orm(column_type = "Text")]
    pub image_url: String,

    /// Predicted species name; joined against the catalog by name, not a
    /// strict foreign key.
    pub predicted_class: String,

    pub confidence: f64,

    /// True when the result came from the mock fallback rather than the
    /// external predictor.
    pub fallback: bool,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
