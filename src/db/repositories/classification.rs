use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::{classification_records, users};

/// Per-class aggregate over all classification records.
#[derive(Debug, Clone)]
pub struct ClassFrequency {
    pub class_name: String,
    pub count: i64,
    pub avg_confidence: f64,
}

pub struct ClassificationRepository {
    conn: DatabaseConnection,
}

impl ClassificationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Persist one classification event. Records are append-only.
    pub async fn insert(
        &self,
        user_id: i32,
        image_url: &str,
        predicted_class: &str,
        confidence: f64,
        fallback: bool,
    ) -> Result<classification_records::Model> {
        let active = classification_records::ActiveModel {
            user_id: Set(user_id),
            image_url: Set(image_url.to_string()),
            predicted_class: Set(predicted_class.to_string()),
            confidence: Set(confidence),
            fallback: Set(fallback),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert classification record")?;

        Ok(model)
    }

    /// Most recent records for one user, newest first.
    pub async fn recent_for_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<classification_records::Model>> {
        classification_records::Entity::find()
            .filter(classification_records::Column::UserId.eq(user_id))
            .order_by_desc(classification_records::Column::CreatedAt)
            .order_by_desc(classification_records::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query classification history")
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<classification_records::Model>> {
        classification_records::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query classification record by ID")
    }

    pub async fn count(&self) -> Result<u64> {
        classification_records::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count classification records")
    }

    /// Per predicted class: record count and average confidence, sorted
    /// descending by count, truncated to `limit` classes.
    pub async fn class_frequencies(&self, limit: usize) -> Result<Vec<ClassFrequency>> {
        let rows: Vec<(String, i64, f64)> = classification_records::Entity::find()
            .select_only()
            .column(classification_records::Column::PredictedClass)
            .column_as(classification_records::Column::Id.count(), "count")
            .column_as(
                classification_records::Column::Confidence.sum(),
                "confidence_sum",
            )
            .group_by(classification_records::Column::PredictedClass)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to aggregate classification records")?;

        let mut frequencies: Vec<ClassFrequency> = rows
            .into_iter()
            .map(|(class_name, count, confidence_sum)| {
                let avg_confidence = if count > 0 {
                    confidence_sum / count as f64
                } else {
                    0.0
                };
                ClassFrequency {
                    class_name,
                    count,
                    avg_confidence,
                }
            })
            .collect();

        frequencies.sort_by(|a, b| b.count.cmp(&a.count));
        frequencies.truncate(limit);

        Ok(frequencies)
    }

    /// Most recent records across all users, with the owning user attached.
    pub async fn recent_with_users(
        &self,
        limit: u64,
    ) -> Result<Vec<(classification_records::Model, Option<users::Model>)>> {
        classification_records::Entity::find()
            .find_also_related(users::Entity)
            .order_by_desc(classification_records::Column::CreatedAt)
            .order_by_desc(classification_records::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query recent classification records")
    }

    /// Paginated log view, newest first. Returns the page rows and the total
    /// record count.
    pub async fn paginate_with_users(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(
        Vec<(classification_records::Model, Option<users::Model>)>,
        u64,
    )> {
        let paginator = classification_records::Entity::find()
            .find_also_related(users::Entity)
            .order_by_desc(classification_records::Column::CreatedAt)
            .order_by_desc(classification_records::Column::Id)
            .paginate(&self.conn, page_size);

        let total = paginator
            .num_items()
            .await
            .context("Failed to count classification records")?;

        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .context("Failed to fetch classification log page")?;

        Ok((items, total))
    }
}
