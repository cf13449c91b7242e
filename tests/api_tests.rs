use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use biolens::auth::AuthTokens;
use biolens::config::{AuthConfig, Config};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Credentials seeded by the initial migration.
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

/// Valid base64 payload standing in for an image.
const IMAGE_B64: &str = "aGVsbG8gZGlhdG9tcw==";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A pool of one keeps every connection on the same in-memory database.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    // Nothing listens here, so every classification takes the fallback path.
    config.predictor.base_url = "http://127.0.0.1:9".to_string();
    config.predictor.request_timeout_seconds = 1;

    let state = biolens::api::create_app_state(config)
        .await
        .expect("Failed to create app state");
    biolens::api::router(state)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

async fn signup(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    send_json(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": password,
            "confirmPassword": password,
        })),
    )
    .await
}

async fn user_token(app: &Router, email: &str) -> String {
    let (status, body) = signup(app, "Test User", email, "password123").await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/admin/login",
        None,
        Some(json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn classify(app: &Router, token: &str) -> (StatusCode, Value) {
    send_json(
        app,
        "POST",
        "/api/classification/classify",
        Some(token),
        Some(json!({"imageBase64": IMAGE_B64})),
    )
    .await
}

#[tokio::test]
async fn signup_issues_decodable_token() {
    let app = spawn_app().await;

    let (status, body) = signup(&app, "Ada", "ada@example.com", "password123").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["email"], json!("ada@example.com"));
    assert!(body["user"]["id"].is_i64());

    let tokens = AuthTokens::new(&AuthConfig::default());
    let claims = tokens.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.email.as_deref(), Some("ada@example.com"));
    assert!(!claims.is_admin);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn signup_rejects_invalid_input() {
    let app = spawn_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({"name": "Ada", "email": "", "password": "x", "confirmPassword": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "password123",
            "confirmPassword": "different",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Passwords do not match"));

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "short",
            "confirmPassword": "short",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = signup(&app, "Ada", "ada@example.com", "password123").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = signup(&app, "Ada Again", "ada@example.com", "password123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Email already registered"));
}

#[tokio::test]
async fn login_distinguishes_unknown_user_from_bad_password() {
    let app = spawn_app().await;
    user_token(&app, "known@example.com").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "nobody@example.com", "password": "whatever"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "known@example.com", "password": "wrongpass"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn classify_requires_auth_and_an_image() {
    let app = spawn_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/classification/classify",
        None,
        Some(json!({"imageBase64": IMAGE_B64})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = user_token(&app, "user@example.com").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/classification/classify",
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/classification/classify",
        Some(&token),
        Some(json!({"imageBase64": "!!!not-base64!!!"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn classify_falls_back_when_predictor_is_down() {
    let app = spawn_app().await;
    let token = user_token(&app, "user@example.com").await;

    let (status, body) = classify(&app, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let classification = &body["classification"];
    assert_eq!(classification["fallback"], json!(true));

    let class_name = classification["className"].as_str().unwrap();
    let labels = biolens::config::SpeciesConfig::default().labels;
    assert!(labels.iter().any(|l| l == class_name));

    let confidence = classification["confidence"].as_f64().unwrap();
    assert!((0.70..=0.99).contains(&confidence));

    // Seeded catalog covers every default label, so enrichment is real text.
    assert!(classification["recordId"].is_i64());
    assert!(
        !classification["scientificDescription"]
            .as_str()
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn classify_accepts_data_url_payloads() {
    let app = spawn_app().await;
    let token = user_token(&app, "user@example.com").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/classification/classify",
        Some(&token),
        Some(json!({"imageBase64": format!("data:image/jpeg;base64,{IMAGE_B64}")})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn history_is_newest_first_with_one_record_per_submission() {
    let app = spawn_app().await;
    let token = user_token(&app, "user@example.com").await;

    let (_, first) = classify(&app, &token).await;
    let (_, second) = classify(&app, &token).await;
    let first_id = first["classification"]["recordId"].as_i64().unwrap();
    let second_id = second["classification"]["recordId"].as_i64().unwrap();
    assert_ne!(first_id, second_id);

    let (status, body) = send_json(
        &app,
        "GET",
        "/api/classification/history",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["id"].as_i64().unwrap(), second_id);
    assert_eq!(history[1]["id"].as_i64().unwrap(), first_id);
    assert!(history[0]["diatomClass"].is_object());
}

#[tokio::test]
async fn record_fetch_checks_existence_before_ownership() {
    let app = spawn_app().await;
    let owner = user_token(&app, "owner@example.com").await;
    let other = user_token(&app, "other@example.com").await;

    let (_, body) = classify(&app, &owner).await;
    let record_id = body["classification"]["recordId"].as_i64().unwrap();

    let uri = format!("/api/classification/{record_id}");
    let (status, _) = send_json(&app, "GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, "GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        send_json(&app, "GET", "/api/classification/999999", Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_audience_tokens_are_forbidden_not_unauthorized() {
    let app = spawn_app().await;
    let user = user_token(&app, "user@example.com").await;
    let admin = admin_token(&app).await;

    let (status, _) = send_json(&app, "GET", "/api/admin/stats", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(&app, "GET", "/api/auth/profile", Some(&admin), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(&app, "GET", "/api/admin/stats", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &app,
        "GET",
        "/api/admin/stats",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_login_uses_seeded_credentials() {
    let app = spawn_app().await;

    let token = admin_token(&app).await;
    let tokens = AuthTokens::new(&AuthConfig::default());
    let claims = tokens.verify(&token).unwrap();
    assert!(claims.is_admin);
    assert_eq!(claims.username.as_deref(), Some(ADMIN_USERNAME));

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/admin/login",
        None,
        Some(json!({"username": ADMIN_USERNAME, "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/admin/login",
        None,
        Some(json!({"username": "nobody", "password": "whatever"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn created_catalog_entry_is_returned_verbatim() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/admin/diatom-classes",
        Some(&admin),
        Some(json!({
            "name": "Cymbella",
            "scientificDescription": "Asymmetric biraphid diatom common in alkaline streams.",
            "environmentalSignificance": "Indicator of moderate nutrient enrichment.",
            "impacts": "Contributes to periphyton mats in hard-water rivers.",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["diatomClass"]["name"], json!("Cymbella"));

    let (status, body) =
        send_json(&app, "GET", "/api/classification/classes/all", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let classes = body["classes"].as_array().unwrap();
    assert_eq!(classes.len(), 7);

    let cymbella = classes
        .iter()
        .find(|c| c["name"] == json!("Cymbella"))
        .unwrap();
    assert_eq!(
        cymbella["scientificDescription"],
        json!("Asymmetric biraphid diatom common in alkaline streams.")
    );
    assert_eq!(
        cymbella["environmentalSignificance"],
        json!("Indicator of moderate nutrient enrichment.")
    );
    assert_eq!(
        cymbella["impacts"],
        json!("Contributes to periphyton mats in hard-water rivers.")
    );
}

#[tokio::test]
async fn duplicate_catalog_name_is_rejected() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/admin/diatom-classes",
        Some(&admin),
        Some(json!({
            "name": "Navicula",
            "scientificDescription": "Duplicate entry attempt.",
            "environmentalSignificance": "Duplicate entry attempt.",
            "impacts": "Duplicate entry attempt.",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Diatom class already exists"));

    let (_, body) = send_json(&app, "GET", "/api/classification/classes/all", None, None).await;
    let naviculas = body["classes"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["name"] == json!("Navicula"))
        .count();
    assert_eq!(naviculas, 1);
}

#[tokio::test]
async fn catalog_update_and_delete_handle_unknown_ids() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;

    let payload = json!({
        "name": "Updated",
        "scientificDescription": "Updated.",
        "environmentalSignificance": "Updated.",
        "impacts": "Updated.",
    });

    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/admin/diatom-classes/999999",
        Some(&admin),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "DELETE",
        "/api/admin/diatom-classes/999999",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn logs_paginate_with_defaults() {
    let app = spawn_app().await;
    let user = user_token(&app, "busy@example.com").await;
    let admin = admin_token(&app).await;

    for _ in 0..25 {
        let (status, _) = classify(&app, &user).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send_json(
        &app,
        "GET",
        "/api/admin/logs?page=2&limit=20",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["logs"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["total"], json!(25));
    assert_eq!(body["pagination"]["page"], json!(2));
    assert_eq!(body["pagination"]["limit"], json!(20));
    assert_eq!(body["pagination"]["pages"], json!(2));

    // Defaults are page 1, 20 entries.
    let (status, body) = send_json(&app, "GET", "/api/admin/logs", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logs"].as_array().unwrap().len(), 20);
    assert_eq!(body["pagination"]["page"], json!(1));
}

#[tokio::test]
async fn stats_aggregate_totals_and_recent_activity() {
    let app = spawn_app().await;
    let user = user_token(&app, "stats@example.com").await;
    let admin = admin_token(&app).await;

    for _ in 0..7 {
        classify(&app, &user).await;
    }

    let (status, body) = send_json(&app, "GET", "/api/admin/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let stats = &body["stats"];
    assert_eq!(stats["totalUsers"], json!(1));
    assert_eq!(stats["totalClassifications"], json!(7));
    assert_eq!(stats["totalClasses"], json!(6));

    let top = stats["topClasses"].as_array().unwrap();
    assert!(!top.is_empty());
    let total_counted: i64 = top.iter().map(|c| c["count"].as_i64().unwrap()).sum();
    assert_eq!(total_counted, 7);
    for class in top {
        let avg = class["avgConfidence"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&avg));
    }

    let recent = stats["recentClassifications"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["user"]["email"], json!("stats@example.com"));
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let app = spawn_app().await;

    let (status, body) = send_json(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));

    let (status, body) = send_json(&app, "GET", "/api/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Endpoint not found"));
}
