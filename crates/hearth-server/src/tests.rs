//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use hearth_core::db::Database;
use hearth_core::Defaults;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Two owners, one recurring charge, weeks 1 and 2 occupied
const SPLIT_DOCUMENT: &str = r#"{
    "year": 2021,
    "participants": [
        {"name": "A", "percent": 50},
        {"name": "B", "percent": 50}
    ],
    "charges": [{"name": "All", "type": "recurring", "amount": 120000}],
    "weeks": [{"who": "A"}, {"who": "B"}]
}"#;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    let defaults = Defaults::embedded().unwrap();
    create_router(db, defaults, None, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, body: &str, if_match: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(version) = if_match {
        builder = builder.header("If-Match", version);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

// ========== Health / Defaults ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_get_defaults() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/defaults")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["purchasePrice"], 500000.0);
    assert_eq!(json["participants"].as_array().unwrap().len(), 3);
    assert_eq!(json["categories"][0]["name"], "Owners");
    let weeks = json["weeks"].as_array().unwrap().len();
    assert!(weeks == 52 || weeks == 53);
}

// ========== Configuration Store ==========

#[tokio::test]
async fn test_config_crud() {
    let app = setup_test_app();

    // Missing configuration
    let response = app
        .clone()
        .oneshot(get("/api/configs/summer"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Create
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/configs/summer", SPLIT_DOCUMENT, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["version"], 1);

    // Read back the normalized document
    let response = app
        .clone()
        .oneshot(get("/api/configs/summer"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["year"], 2021);
    assert_eq!(json["weeks"].as_array().unwrap().len(), 52);
    assert_eq!(json["weeks"][1]["who"], "B");
    // People were derived from the participants
    assert_eq!(json["people"].as_array().unwrap().len(), 2);

    // All configurations, keyed by name
    let response = app.clone().oneshot(get("/api/configs")).await.unwrap();
    let json = get_body_json(response).await;
    assert!(json["summer"].is_object());

    // Delete, twice
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/configs/summer")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["ok"], true);
    }

    let response = app.oneshot(get("/api/configs/summer")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_config_version_conflict() {
    let app = setup_test_app();

    // Expecting an existing version on a new name conflicts
    let response = app
        .clone()
        .oneshot(send_json("PUT", "/api/configs/c", SPLIT_DOCUMENT, Some("1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(send_json("PUT", "/api/configs/c", SPLIT_DOCUMENT, None))
        .await
        .unwrap();
    assert_eq!(get_body_json(response).await["version"], 1);

    // Weak ETag form is accepted
    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            "/api/configs/c",
            SPLIT_DOCUMENT,
            Some("W/\"1\""),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["version"], 2);

    // Stale version
    let response = app
        .clone()
        .oneshot(send_json("PUT", "/api/configs/c", SPLIT_DOCUMENT, Some("1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("conflict"));

    // Unparseable version
    let response = app
        .oneshot(send_json(
            "PUT",
            "/api/configs/c",
            SPLIT_DOCUMENT,
            Some("abc"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_config_names_are_trimmed() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/configs/%20spring", SPLIT_DOCUMENT, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for uri in ["/api/configs/%20spring", "/api/configs/spring"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // A blank name is a client error, not a server failure
    let response = app.oneshot(get("/api/configs/%20")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_save_config_invalid_body() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/configs/bad", "{not json", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_body_json(response).await["error"], "Invalid JSON");

    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/configs/bad", "[1, 2, 3]", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was stored
    let response = app.oneshot(get("/api/configs/bad")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_config_summaries() {
    let app = setup_test_app();

    for name in ["winter", "autumn"] {
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                &format!("/api/configs/{}", name),
                "{}",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/api/configs/summary")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let summaries = json.as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0]["name"], "autumn");
    assert_eq!(summaries[0]["version"], 1);
    assert!(summaries[0]["updatedAt"].is_string());
}

// ========== Simulation ==========

#[tokio::test]
async fn test_simulate_document() {
    let app = setup_test_app();

    let response = app
        .oneshot(send_json("POST", "/api/simulate", SPLIT_DOCUMENT, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["year"], 2021);
    assert_eq!(json["annual"]["total"], 120000.0);
    assert_eq!(json["pricing"]["usedWeekCount"], 2);
    assert_eq!(json["pricing"]["weeks"][0]["suggested"], 60000.0);
    assert_eq!(json["pricing"]["weeks"][1]["real"], 60000.0);
    assert_eq!(json["pricing"]["weeks"][2]["used"], false);

    let participants = json["settlement"]["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0]["share"], 60000.0);
    assert_eq!(participants[0]["selfPaid"], 60000.0);
    assert_eq!(json["settlement"]["ownershipWarning"], false);
}

#[tokio::test]
async fn test_simulate_stored_config() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(get("/api/configs/missing/simulation"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.clone()
        .oneshot(send_json("POST", "/api/configs/split", SPLIT_DOCUMENT, None))
        .await
        .unwrap();

    let response = app
        .oneshot(get("/api/configs/split/simulation"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["settlement"]["totalReal"], 120000.0);
}

#[tokio::test]
async fn test_simulate_empty_document() {
    let app = setup_test_app();

    let response = app
        .oneshot(send_json("POST", "/api/simulate", "{}", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["annual"]["total"], 0.0);
    assert_eq!(json["pricing"]["usedWeekCount"], 0);
}

// ========== Calendar ==========

#[tokio::test]
async fn test_get_calendar() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(get("/api/calendar/2020"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["year"], 2020);
    assert_eq!(json["weekCount"], 53);
    assert_eq!(json["weeks"][0]["label"], "S01");
    assert_eq!(json["weeks"][0]["weight"], 100.0);

    // Out-of-range years are clamped
    let response = app.oneshot(get("/api/calendar/5000")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["year"], 2100);
}

#[tokio::test]
async fn test_get_calendar_invalid_year() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/calendar/soon")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Limits ==========

#[tokio::test]
async fn test_body_limit() {
    let app = setup_test_app();

    let oversized = " ".repeat(MAX_BODY_SIZE + 1);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/simulate")
                .header("Content-Type", "application/json")
                .header("Content-Length", oversized.len())
                .body(Body::from(oversized))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
