use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::types::{
    AdminDto, AdminLoginRequest, AdminLoginResponse, DiatomClassDto, DiatomClassInput,
    DiatomClassResponse, LogEntryDto, LogsQuery, LogsResponse, MessageResponse, PaginationDto,
    RecentClassificationDto, RecordUserDto, StatsDto, StatsResponse, TopClassDto,
};
use super::{ApiError, AppState};
use crate::constants::limits::{
    DEFAULT_LOG_PAGE_SIZE, RECENT_CLASSIFICATIONS_LIMIT, TOP_CLASSES_LIMIT,
};

/// POST /api/admin/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Username and password are required"));
    }

    let admin = state
        .store
        .get_admin_by_username(payload.username.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Admin not found"))?;

    let is_valid = state
        .store
        .verify_admin_password(&admin.username, &payload.password)
        .await?;

    if !is_valid {
        return Err(ApiError::validation("Invalid credentials"));
    }

    let token = state
        .tokens
        .issue_admin(admin.id, &admin.username)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    tracing::info!("Admin logged in: {}", admin.username);

    Ok(Json(AdminLoginResponse {
        success: true,
        message: "Admin login successful".to_string(),
        token,
        admin: AdminDto::from(admin),
    }))
}

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let total_users = state.store.count_users().await?;
    let total_classifications = state.store.count_classifications().await?;
    let total_classes = state.store.count_diatom_classes().await?;

    let top_classes = state
        .store
        .class_frequencies(TOP_CLASSES_LIMIT)
        .await?
        .into_iter()
        .map(TopClassDto::from)
        .collect();

    let recent_classifications = state
        .store
        .recent_classifications_with_users(RECENT_CLASSIFICATIONS_LIMIT)
        .await?
        .into_iter()
        .map(|(record, user)| RecentClassificationDto {
            id: record.id,
            predicted_class: record.predicted_class,
            confidence: record.confidence,
            fallback: record.fallback,
            created_at: record.created_at,
            user: user.map(RecordUserDto::from),
        })
        .collect();

    Ok(Json(StatsResponse {
        success: true,
        stats: StatsDto {
            total_users,
            total_classifications,
            total_classes,
            top_classes,
            recent_classifications,
        },
    }))
}

/// GET /api/admin/logs?page&limit
pub async fn logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = match query.limit {
        Some(0) | None => DEFAULT_LOG_PAGE_SIZE,
        Some(limit) => limit,
    };

    let (rows, total) = state.store.classification_log_page(page, limit).await?;

    let logs = rows
        .into_iter()
        .map(|(record, user)| LogEntryDto {
            id: record.id,
            predicted_class: record.predicted_class,
            confidence: record.confidence,
            fallback: record.fallback,
            created_at: record.created_at,
            user: user.map(RecordUserDto::from),
        })
        .collect();

    Ok(Json(LogsResponse {
        success: true,
        logs,
        pagination: PaginationDto {
            total,
            page,
            limit,
            pages: total.div_ceil(limit),
        },
    }))
}

fn validate_class_input(input: &DiatomClassInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty()
        || input.scientific_description.trim().is_empty()
        || input.environmental_significance.trim().is_empty()
        || input.impacts.trim().is_empty()
    {
        return Err(ApiError::validation("All fields are required"));
    }
    Ok(())
}

/// POST /api/admin/diatom-classes
pub async fn create_class(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DiatomClassInput>,
) -> Result<(StatusCode, Json<DiatomClassResponse>), ApiError> {
    validate_class_input(&payload)?;

    let name = payload.name.trim();

    if state.store.find_diatom_class_by_name(name).await?.is_some() {
        return Err(ApiError::validation("Diatom class already exists"));
    }

    let class = state
        .store
        .create_diatom_class(
            name,
            payload.scientific_description.trim(),
            payload.environmental_significance.trim(),
            payload.impacts.trim(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DiatomClassResponse {
            success: true,
            message: "Diatom class created successfully".to_string(),
            diatom_class: DiatomClassDto::from(class),
        }),
    ))
}

/// PUT /api/admin/diatom-classes/{class_id}
pub async fn update_class(
    State(state): State<Arc<AppState>>,
    Path(class_id): Path<i32>,
    Json(payload): Json<DiatomClassInput>,
) -> Result<Json<DiatomClassResponse>, ApiError> {
    validate_class_input(&payload)?;

    let name = payload.name.trim();

    // Renaming onto another entry would violate the unique name constraint.
    if let Some(existing) = state.store.find_diatom_class_by_name(name).await?
        && existing.id != class_id
    {
        return Err(ApiError::validation("Diatom class already exists"));
    }

    let class = state
        .store
        .update_diatom_class(
            class_id,
            name,
            payload.scientific_description.trim(),
            payload.environmental_significance.trim(),
            payload.impacts.trim(),
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Diatom class not found"))?;

    Ok(Json(DiatomClassResponse {
        success: true,
        message: "Diatom class updated successfully".to_string(),
        diatom_class: DiatomClassDto::from(class),
    }))
}

/// DELETE /api/admin/diatom-classes/{class_id}
pub async fn delete_class(
    State(state): State<Arc<AppState>>,
    Path(class_id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state.store.delete_diatom_class(class_id).await?;

    if !deleted {
        return Err(ApiError::not_found("Diatom class not found"));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Diatom class deleted successfully".to_string(),
    }))
}
