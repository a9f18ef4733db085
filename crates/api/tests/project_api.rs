//! Integration tests for project briefings, advice and health.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app};
use roombrief_core::project::NewProject;
use roombrief_core::room::{Floor, Priority, Room, RoomType};
use roombrief_db::ProjectStore;
use roombrief_genai::advisor::{STYLES_UNAVAILABLE, SUMMARY_UNAVAILABLE};
use serde_json::json;
use tower::ServiceExt;

fn room(room_type: RoomType, floor: Floor, priority: Priority) -> Room {
    Room {
        room_type,
        floor,
        priority,
        ..Room::new()
    }
}

fn sample_project() -> NewProject {
    NewProject {
        title: "Townhouse".into(),
        location: "Taipei".into(),
        size: 42.0,
        rooms: [
            room(RoomType::MasterBedroom, Floor::default(), Priority::Low),
            room(RoomType::Kitchen, Floor::default(), Priority::High),
        ]
        .into_iter()
        .collect(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Test: GET /health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = build_test_app();
    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["store_healthy"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = app.get("/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app();
    let response = app.get("/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn cors_preflight_allows_dev_origin() {
    let app = build_test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/session/actions")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

// ---------------------------------------------------------------------------
// Test: project list and briefing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_cards_newest_first() {
    let app = build_test_app();
    for title in ["First", "Second"] {
        app.store
            .create(NewProject {
                title: title.into(),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let json = body_json(app.get("/api/v1/projects").await).await;

    let cards = json["data"].as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["title"], "Second");
    assert_eq!(cards[1]["title"], "First");
    assert_eq!(cards[0]["location"], "Location not specified");
}

#[tokio::test]
async fn briefing_in_grid_layout_by_default() {
    let app = build_test_app();
    let id = app.store.create(sample_project()).await.unwrap();

    let response = app.get(&format!("/api/v1/projects/{id}/briefing")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["briefing"]["room_count"], 2);
    assert_eq!(data["briefing"]["priorities"], json!({"high": 1, "medium": 0, "low": 1}));
    assert_eq!(data["layout"]["layout"], "grid");
}

#[tokio::test]
async fn briefing_accepts_column_and_dashboard_layouts() {
    let app = build_test_app();
    let id = app.store.create(sample_project()).await.unwrap();

    for layout in ["column", "dashboard"] {
        let json = body_json(
            app.get(&format!("/api/v1/projects/{id}/briefing?layout={layout}"))
                .await,
        )
        .await;
        assert_eq!(json["data"]["layout"]["layout"], layout);
    }
}

#[tokio::test]
async fn briefing_rejects_unknown_layout() {
    let app = build_test_app();
    let id = app.store.create(sample_project()).await.unwrap();

    let response = app
        .get(&format!("/api/v1/projects/{id}/briefing?layout=carousel"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn briefing_for_missing_project_returns_404() {
    let app = build_test_app();

    let response = app.get("/api/v1/projects/nope/briefing").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Project with id nope not found");
}

// ---------------------------------------------------------------------------
// Test: advice falls back when no generator is configured
// ---------------------------------------------------------------------------

#[tokio::test]
async fn summary_without_api_key_returns_fallback() {
    let app = build_test_app();
    let id = app.store.create(sample_project()).await.unwrap();

    let response = app
        .post_json(&format!("/api/v1/projects/{id}/summary"), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["text"], SUMMARY_UNAVAILABLE);
}

#[tokio::test]
async fn style_suggestions_without_api_key_returns_fallback() {
    let app = build_test_app();

    let response = app
        .post_json(
            "/api/v1/style-suggestions",
            json!({"description": "Two cats, lots of plants, works from home"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["text"], STYLES_UNAVAILABLE);
}

#[tokio::test]
async fn style_suggestions_require_a_description() {
    let app = build_test_app();

    let response = app
        .post_json("/api/v1/style-suggestions", json!({"description": "  "}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
