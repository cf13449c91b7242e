use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::AuthTokens;
use crate::catalog::SpeciesIndex;
use crate::clients::PredictorClient;
use crate::config::Config;
use crate::db::Store;

mod admin;
pub mod auth;
mod classification;
mod error;
mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub tokens: AuthTokens,

    pub predictor: PredictorClient,

    pub species: Arc<SpeciesIndex>,
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let species = Arc::new(SpeciesIndex::from_config(&config.species));
    let tokens = AuthTokens::new(&config.auth);
    let predictor = PredictorClient::new(&config.predictor, species.clone())?;

    Ok(Arc::new(AppState {
        config,
        store,
        tokens,
        predictor,
        species,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let user_routes = Router::new()
        .route("/auth/profile", get(auth::profile))
        .route("/classification/classify", post(classification::classify))
        .route("/classification/history", get(classification::history))
        .route(
            "/classification/{record_id}",
            get(classification::get_record),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    let admin_routes = Router::new()
        .route("/admin/stats", get(admin::stats))
        .route("/admin/logs", get(admin::logs))
        .route(
            "/admin/diatom-classes",
            post(admin::create_class).get(classification::list_classes),
        )
        .route(
            "/admin/diatom-classes/{class_id}",
            put(admin::update_class).delete(admin::delete_class),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let api_router = Router::new()
        .merge(user_routes)
        .merge(admin_routes)
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/admin/login", post(admin::login))
        .route(
            "/classification/classes/all",
            get(classification::list_classes),
        )
        .route("/health", get(health))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .fallback(endpoint_not_found)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    state
        .store
        .ping()
        .await
        .map_err(|e| ApiError::internal(format!("Database unreachable: {e}")))?;

    Ok(Json(HealthResponse {
        success: true,
        status: "healthy".to_string(),
    }))
}

async fn endpoint_not_found(uri: Uri) -> Response {
    tracing::debug!("Unknown route requested: {}", uri);

    let body = ErrorResponse {
        success: false,
        message: "Endpoint not found".to_string(),
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
