use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::AuthConfig;
use crate::entities::{classification_records, diatom_classes, users};

pub mod migrator;
pub mod repositories;

pub use repositories::admin::Admin;
pub use repositories::classification::ClassFrequency;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    fn diatom_class_repo(&self) -> repositories::diatom_class::DiatomClassRepository {
        repositories::diatom_class::DiatomClassRepository::new(self.conn.clone())
    }

    fn classification_repo(&self) -> repositories::classification::ClassificationRepository {
        repositories::classification::ClassificationRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        config: &AuthConfig,
    ) -> Result<User> {
        self.user_repo().create(name, email, password, config).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ========== Admins ==========

    pub async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        self.admin_repo().get_by_username(username).await
    }

    pub async fn verify_admin_password(&self, username: &str, password: &str) -> Result<bool> {
        self.admin_repo().verify_password(username, password).await
    }

    // ========== Diatom class catalog ==========

    pub async fn create_diatom_class(
        &self,
        name: &str,
        scientific_description: &str,
        environmental_significance: &str,
        impacts: &str,
    ) -> Result<diatom_classes::Model> {
        self.diatom_class_repo()
            .create(
                name,
                scientific_description,
                environmental_significance,
                impacts,
            )
            .await
    }

    pub async fn get_diatom_class(&self, id: i32) -> Result<Option<diatom_classes::Model>> {
        self.diatom_class_repo().get_by_id(id).await
    }

    pub async fn find_diatom_class_by_name(
        &self,
        name: &str,
    ) -> Result<Option<diatom_classes::Model>> {
        self.diatom_class_repo().find_by_name(name).await
    }

    pub async fn list_diatom_classes(&self) -> Result<Vec<diatom_classes::Model>> {
        self.diatom_class_repo().list_all().await
    }

    pub async fn update_diatom_class(
        &self,
        id: i32,
        name: &str,
        scientific_description: &str,
        environmental_significance: &str,
        impacts: &str,
    ) -> Result<Option<diatom_classes::Model>> {
        self.diatom_class_repo()
            .update(
                id,
                name,
                scientific_description,
                environmental_significance,
                impacts,
            )
            .await
    }

    pub async fn delete_diatom_class(&self, id: i32) -> Result<bool> {
        self.diatom_class_repo().delete(id).await
    }

    pub async fn count_diatom_classes(&self) -> Result<u64> {
        self.diatom_class_repo().count().await
    }

    // ========== Classification records ==========

    pub async fn insert_classification(
        &self,
        user_id: i32,
        image_url: &str,
        predicted_class: &str,
        confidence: f64,
        fallback: bool,
    ) -> Result<classification_records::Model> {
        self.classification_repo()
            .insert(user_id, image_url, predicted_class, confidence, fallback)
            .await
    }

    pub async fn classifications_for_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<classification_records::Model>> {
        self.classification_repo()
            .recent_for_user(user_id, limit)
            .await
    }

    pub async fn get_classification(&self, id: i32) -> Result<Option<classification_records::Model>> {
        self.classification_repo().get_by_id(id).await
    }

    pub async fn count_classifications(&self) -> Result<u64> {
        self.classification_repo().count().await
    }

    pub async fn class_frequencies(&self, limit: usize) -> Result<Vec<ClassFrequency>> {
        self.classification_repo().class_frequencies(limit).await
    }

    pub async fn recent_classifications_with_users(
        &self,
        limit: u64,
    ) -> Result<Vec<(classification_records::Model, Option<users::Model>)>> {
        self.classification_repo().recent_with_users(limit).await
    }

    pub async fn classification_log_page(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(
        Vec<(classification_records::Model, Option<users::Model>)>,
        u64,
    )> {
        self.classification_repo()
            .paginate_with_users(page, page_size)
            .await
    }
}
