use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::diatom_classes;

pub struct DiatomClassRepository {
    conn: DatabaseConnection,
}

impl DiatomClassRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        name: &str,
        scientific_description: &str,
        environmental_significance: &str,
        impacts: &str,
    ) -> Result<diatom_classes::Model> {
        let active = diatom_classes::ActiveModel {
            name: Set(name.to_string()),
            scientific_description: Set(scientific_description.to_string()),
            environmental_significance: Set(environmental_significance.to_string()),
            impacts: Set(impacts.to_string()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert diatom class")?;

        Ok(model)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<diatom_classes::Model>> {
        diatom_classes::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query diatom class by ID")
    }

    /// Lookup by predicted class name. Absence is a valid, handled state for
    /// enrichment callers.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<diatom_classes::Model>> {
        diatom_classes::Entity::find()
            .filter(diatom_classes::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query diatom class by name")
    }

    pub async fn list_all(&self) -> Result<Vec<diatom_classes::Model>> {
        diatom_classes::Entity::find()
            .order_by_asc(diatom_classes::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list diatom classes")
    }

    /// Update all narrative fields of a catalog entry. Returns `None` if the
    /// id does not exist.
    pub async fn update(
        &self,
        id: i32,
        name: &str,
        scientific_description: &str,
        environmental_significance: &str,
        impacts: &str,
    ) -> Result<Option<diatom_classes::Model>> {
        let Some(existing) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: diatom_classes::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.scientific_description = Set(scientific_description.to_string());
        active.environmental_significance = Set(environmental_significance.to_string());
        active.impacts = Set(impacts.to_string());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update diatom class")?;

        Ok(Some(model))
    }

    /// Delete a catalog entry. Returns `false` if the id does not exist.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = diatom_classes::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete diatom class")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        diatom_classes::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count diatom classes")
    }
}
