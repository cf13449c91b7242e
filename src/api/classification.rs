use axum::{
    Extension, Json,
    extract::{Path, State},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::collections::HashMap;
use std::sync::Arc;

use super::auth::AuthUser;
use super::types::{
    ClassListResponse, ClassificationRecordDto, ClassificationResultDto, ClassifyRequest,
    ClassifyResponse, DiatomClassDto, HistoryResponse, RecordResponse,
};
use super::{ApiError, AppState};
use crate::constants::classification::IMAGE_PREFIX_LEN;
use crate::constants::limits::HISTORY_LIMIT;

const DESCRIPTION_PLACEHOLDER: &str = "Scientific description not available";
const SIGNIFICANCE_PLACEHOLDER: &str = "Environmental significance not available";
const IMPACTS_PLACEHOLDER: &str = "Ecological impacts not available";

/// POST /api/classification/classify
///
/// Runs the full submission pipeline: decode, predict (with fallback),
/// enrich from the catalog, persist, respond. A successful call always
/// leaves exactly one new record behind.
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let Some(image_base64) = payload.image_base64.filter(|s| !s.is_empty()) else {
        return Err(ApiError::validation("No image provided"));
    };

    // Mobile clients may send a data URL; only the payload after the comma
    // is base64.
    let encoded = image_base64
        .split_once("base64,")
        .map_or(image_base64.as_str(), |(_, rest)| rest);

    let image_bytes = BASE64
        .decode(encoded)
        .map_err(|_| ApiError::validation("Invalid base64 image data"))?;

    let prediction = state.predictor.classify(image_bytes).await;
    let is_fallback = prediction.is_fallback();
    let classification = prediction.classification();

    let diatom_class = state
        .store
        .find_diatom_class_by_name(&classification.class_name)
        .await?;

    let stored_image = if state.config.classification.retain_full_image {
        image_base64.clone()
    } else {
        image_base64.chars().take(IMAGE_PREFIX_LEN).collect()
    };

    let record = state
        .store
        .insert_classification(
            auth.id,
            &stored_image,
            &classification.class_name,
            classification.confidence,
            is_fallback,
        )
        .await?;

    let result = match diatom_class {
        Some(class) => ClassificationResultDto {
            record_id: record.id,
            class_index: classification.class_index,
            class_name: classification.class_name.clone(),
            confidence: classification.confidence,
            fallback: is_fallback,
            scientific_description: class.scientific_description,
            environmental_significance: class.environmental_significance,
            impacts: class.impacts,
            timestamp: record.created_at,
        },
        None => ClassificationResultDto {
            record_id: record.id,
            class_index: classification.class_index,
            class_name: classification.class_name.clone(),
            confidence: classification.confidence,
            fallback: is_fallback,
            scientific_description: DESCRIPTION_PLACEHOLDER.to_string(),
            environmental_significance: SIGNIFICANCE_PLACEHOLDER.to_string(),
            impacts: IMPACTS_PLACEHOLDER.to_string(),
            timestamp: record.created_at,
        },
    };

    Ok(Json(ClassifyResponse {
        success: true,
        classification: result,
    }))
}

/// GET /api/classification/history
pub async fn history(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let records = state
        .store
        .classifications_for_user(auth.id, HISTORY_LIMIT)
        .await?;

    // One catalog scan instead of a lookup per record.
    let catalog = catalog_by_name(&state).await?;

    let history = records
        .into_iter()
        .map(|record| {
            let class = catalog.get(&record.predicted_class).cloned();
            ClassificationRecordDto::from_model(record, class)
        })
        .collect();

    Ok(Json(HistoryResponse {
        success: true,
        history,
    }))
}

/// GET /api/classification/{record_id}
///
/// Existence is checked before ownership, so probing an unknown id and
/// probing someone else's id are distinguishable (404 vs 403).
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(record_id): Path<i32>,
) -> Result<Json<RecordResponse>, ApiError> {
    let record = state
        .store
        .get_classification(record_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Classification record not found"))?;

    if record.user_id != auth.id {
        return Err(ApiError::forbidden(
            "Not authorized to access this record",
        ));
    }

    let class = state
        .store
        .find_diatom_class_by_name(&record.predicted_class)
        .await?;

    Ok(Json(RecordResponse {
        success: true,
        record: ClassificationRecordDto::from_model(record, class),
    }))
}

/// GET /api/classification/classes/all (public)
pub async fn list_classes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClassListResponse>, ApiError> {
    let classes = state
        .store
        .list_diatom_classes()
        .await?
        .into_iter()
        .map(DiatomClassDto::from)
        .collect();

    Ok(Json(ClassListResponse {
        success: true,
        classes,
    }))
}

async fn catalog_by_name(
    state: &AppState,
) -> Result<HashMap<String, crate::entities::diatom_classes::Model>, ApiError> {
    let classes = state.store.list_diatom_classes().await?;
    Ok(classes
        .into_iter()
        .map(|class| (class.name.clone(), class))
        .collect())
}
