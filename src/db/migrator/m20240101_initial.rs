use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Default admin credentials seeded on first start (username: admin,
/// password: admin123). Rotate these in any real deployment.
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Seed catalog: name, scientific description, environmental significance,
/// ecological impacts.
const SEED_DIATOM_CLASSES: &[(&str, &str, &str, &str)] = &[
    (
        "Asterionella",
        "Asterionella is a genus of diatoms characterized by a distinctive linear shape and a prominent raphe system. They are commonly found in freshwater environments.",
        "Asterionella species are important indicators of water quality and are commonly used in biomonitoring studies. They are sensitive to organic pollution and nutrient enrichment.",
        "High abundance may indicate moderate pollution levels. Often found in slightly acidic to neutral waters. Important for assessing ecosystem health.",
    ),
    (
        "Cyclotella",
        "Cyclotella is a genus of diatoms with a distinctive circular or wheel-shaped frustule. They are commonly found in freshwater environments.",
        "Cyclotella species are versatile indicators used in water quality assessment. Some species tolerate high nutrient levels and pollution.",
        "Presence indicates varying pollution tolerance. Often abundant in eutrophic waters. Used as indicators of nutrient enrichment and organic pollution.",
    ),
    (
        "Fragilaria",
        "Fragilaria is a genus of diatoms that form distinctive chain-like colonies. They are commonly found in freshwater environments.",
        "Fragilaria species are indicators of clean to moderately polluted waters. They are commonly used in water quality assessments.",
        "Indicates relatively clean water conditions. Sensitive to pollution and nutrient enrichment. Important for assessing stream health.",
    ),
    (
        "Gomphonema",
        "Gomphonema is a genus of stalked diatoms with a distinctive wedge or club shape. They are typically attached to substrates via mucilaginous stalks.",
        "Gomphonema species are sensitive indicators of water quality and are particularly useful in assessing oligotrophic to mesotrophic conditions.",
        "Presence indicates good water quality. Sensitive to organic pollution. Often found in fast-flowing streams with high oxygen levels.",
    ),
    (
        "Navicula",
        "Navicula is a genus of small diatoms with a distinctive amphora or vase-like shape. They are found in various aquatic environments.",
        "Navicula species have varying pollution tolerances. Some species are indicators of slightly polluted waters.",
        "Indicates moderate water quality conditions. Some species tolerate pollution. Used in comprehensive biomonitoring assessments.",
    ),
    (
        "Nitzschia",
        "Nitzschia is a genus of large, robust diatoms with a distinctive linear shape and prominent raphe system. They are commonly found in freshwater environments.",
        "Nitzschia species are indicators of acidic to neutral waters. They are relatively tolerant of pollution.",
        "Indicates acidic water conditions. Tolerant of moderate pollution. Often found in oligotrophic waters.",
    ),
];

fn hash_default_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(DEFAULT_ADMIN_PASSWORD.as_bytes(), &salt)
        .expect("Failed to hash default admin password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Admins)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(DiatomClasses)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(ClassificationRecords)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_classification_records_user_id")
                    .table(ClassificationRecords)
                    .col(crate::entities::classification_records::Column::UserId)
                    .to_owned(),
            )
            .await?;

        // Seed default admin
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = hash_default_password();

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Admins)
            .columns([
                crate::entities::admins::Column::Username,
                crate::entities::admins::Column::PasswordHash,
                crate::entities::admins::Column::CreatedAt,
            ])
            .values_panic([
                DEFAULT_ADMIN_USERNAME.into(),
                password_hash.into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        // Seed the catalog
        for (name, description, significance, impacts) in SEED_DIATOM_CLASSES {
            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(DiatomClasses)
                .columns([
                    crate::entities::diatom_classes::Column::Name,
                    crate::entities::diatom_classes::Column::ScientificDescription,
                    crate::entities::diatom_classes::Column::EnvironmentalSignificance,
                    crate::entities::diatom_classes::Column::Impacts,
                ])
                .values_panic([
                    (*name).into(),
                    (*description).into(),
                    (*significance).into(),
                    (*impacts).into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClassificationRecords).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiatomClasses).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
