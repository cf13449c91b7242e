use serde::{Deserialize, Serialize};

use crate::db::{Admin, ClassFrequency, User};
use crate::entities::{classification_records, diatom_classes, users};

/// Error body shared by every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Shared DTOs
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDto {
    pub id: i32,
    pub username: String,
}

impl From<Admin> for AdminDto {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiatomClassDto {
    pub id: i32,
    pub name: String,
    pub scientific_description: String,
    pub environmental_significance: String,
    pub impacts: String,
}

impl From<diatom_classes::Model> for DiatomClassDto {
    fn from(model: diatom_classes::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            scientific_description: model.scientific_description,
            environmental_significance: model.environmental_significance,
            impacts: model.impacts,
        }
    }
}

/// A persisted classification record, optionally enriched with the matching
/// catalog entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRecordDto {
    pub id: i32,
    pub user_id: i32,
    pub image_url: String,
    pub predicted_class: String,
    pub confidence: f64,
    pub fallback: bool,
    pub created_at: String,
    pub diatom_class: Option<DiatomClassDto>,
}

impl ClassificationRecordDto {
    pub fn from_model(
        model: classification_records::Model,
        diatom_class: Option<diatom_classes::Model>,
    ) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            image_url: model.image_url,
            predicted_class: model.predicted_class,
            confidence: model.confidence,
            fallback: model.fallback,
            created_at: model.created_at,
            diatom_class: diatom_class.map(DiatomClassDto::from),
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub admin: AdminDto,
}

// ============================================================================
// Classification
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    pub image_base64: Option<String>,
}

/// The enriched result of one classification submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResultDto {
    pub record_id: i32,
    pub class_index: i64,
    pub class_name: String,
    pub confidence: f64,
    pub fallback: bool,
    pub scientific_description: String,
    pub environmental_significance: String,
    pub impacts: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub success: bool,
    pub classification: ClassificationResultDto,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<ClassificationRecordDto>,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    pub record: ClassificationRecordDto,
}

#[derive(Debug, Serialize)]
pub struct ClassListResponse {
    pub success: bool,
    pub classes: Vec<DiatomClassDto>,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiatomClassInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scientific_description: String,
    #[serde(default)]
    pub environmental_significance: String,
    #[serde(default)]
    pub impacts: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiatomClassResponse {
    pub success: bool,
    pub message: String,
    pub diatom_class: DiatomClassDto,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopClassDto {
    pub class_name: String,
    pub count: i64,
    pub avg_confidence: f64,
}

impl From<ClassFrequency> for TopClassDto {
    fn from(freq: ClassFrequency) -> Self {
        Self {
            class_name: freq.class_name,
            count: freq.count,
            avg_confidence: freq.avg_confidence,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentClassificationDto {
    pub id: i32,
    pub predicted_class: String,
    pub confidence: f64,
    pub fallback: bool,
    pub created_at: String,
    pub user: Option<RecordUserDto>,
}

#[derive(Debug, Serialize)]
pub struct RecordUserDto {
    pub name: String,
    pub email: String,
}

impl From<users::Model> for RecordUserDto {
    fn from(model: users::Model) -> Self {
        Self {
            name: model.name,
            email: model.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub total_users: u64,
    pub total_classifications: u64,
    pub total_classes: u64,
    pub top_classes: Vec<TopClassDto>,
    pub recent_classifications: Vec<RecentClassificationDto>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: StatsDto,
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryDto {
    pub id: i32,
    pub predicted_class: String,
    pub confidence: f64,
    pub fallback: bool,
    pub created_at: String,
    pub user: Option<RecordUserDto>,
}

#[derive(Debug, Serialize)]
pub struct PaginationDto {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub success: bool,
    pub logs: Vec<LogEntryDto>,
    pub pagination: PaginationDto,
}

// ============================================================================
// System
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
}
