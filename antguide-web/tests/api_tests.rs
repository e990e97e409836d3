//! Integration tests for the antguide-web API endpoints
//!
//! Exercises routing, identity extraction, and the error-to-status mapping
//! against a seeded throwaway database. External image endpoints point at an
//! unreachable address so detail views render without network access.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

use antguide_common::db::{init_database, seed_demo_content};
use antguide_web::images::ImageResolver;
use antguide_web::{build_router, AppState};

async fn setup_app() -> (TempDir, axum::Router, SqlitePool) {
    let dir = TempDir::new().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("antguide.db"))
        .await
        .expect("Should initialize database");
    seed_demo_content(&pool).await.expect("Should seed");

    for (username, is_moderator) in [("keeper", false), ("moderator", true)] {
        sqlx::query("INSERT INTO users (username, email, is_moderator, created_at) VALUES (?, '', ?, ?)")
            .bind(username)
            .bind(is_moderator)
            .bind(Utc::now())
            .execute(&pool)
            .await
            .expect("Should create user");
    }

    // Nothing listens on port 1; the image chain absorbs the failures
    let images = ImageResolver::with_endpoints("http://127.0.0.1:1/", "http://127.0.0.1:1/")
        .expect("Should build resolver");
    let state = AppState::new(pool.clone(), images);
    (dir, build_router(state), pool)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_as(uri: &str, user: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-user", user)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user", user);
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn health_endpoint_needs_no_auth() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "antguide-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn species_list_returns_seeded_catalog() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app.oneshot(get("/api/species")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn species_list_applies_filters() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/species?difficulty=easy"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get("/api/species?q=harvester"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["slug"], "messor-barbarus");

    let response = app
        .oneshot(get("/api/species?region=tropical&difficulty=hard"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap()[0]["slug"], "solenopsis-invicta");
}

#[tokio::test]
async fn species_detail_renders_without_external_images() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app
        .oneshot(get("/api/species/lasius-niger"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["species"]["genus"], "Lasius");
    assert_eq!(body["is_bookmarked"], false);
    // Both external sources are unreachable; absence renders as null
    assert_eq!(body["external_image_url"], Value::Null);
}

#[tokio::test]
async fn unknown_species_slug_is_404() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app.oneshot(get("/api/species/atta-texana")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bookmark_requires_identity() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app
        .oneshot(post_json("/api/species/lasius-niger/bookmark", None, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bookmark_toggles_membership() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/species/lasius-niger/bookmark",
            Some("keeper"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["bookmarked"], true);

    let response = app
        .oneshot(post_json(
            "/api/species/lasius-niger/bookmark",
            Some("keeper"),
            json!({}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["bookmarked"], false);
}

#[tokio::test]
async fn compare_tray_round_trip() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/species/lasius-niger/compare",
            Some("keeper"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    app.clone()
        .oneshot(post_json(
            "/api/species/messor-barbarus/compare",
            Some("keeper"),
            json!({}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_as("/api/compare", "keeper"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["species"].as_array().unwrap().len(), 2);

    // Another user's tray is empty
    let response = app
        .clone()
        .oneshot(get_as("/api/compare", "moderator"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["species"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(post_json("/api/compare/clear", Some("keeper"), json!({})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["species"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn flights_list_returns_seeded_sightings() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app.clone().oneshot(get("/api/flights")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 4);

    // Out-of-range limits are clamped, not rejected
    let response = app
        .clone()
        .oneshot(get("/api/flights?limit=5000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/api/flights?region=Austin"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["species_name"], "Solenopsis invicta");
    assert_eq!(results[0]["reporter"], Value::Null);
}

#[tokio::test]
async fn flight_submission_records_reporter() {
    let (_dir, app, pool) = setup_app().await;

    let species_id: i64 =
        sqlx::query_scalar("SELECT id FROM species WHERE slug = 'lasius-niger'")
            .fetch_one(&pool)
            .await
            .unwrap();

    let response = app
        .oneshot(post_json(
            "/api/flights",
            Some("keeper"),
            json!({
                "species_id": species_id,
                "location_name": "Streetlight by the park",
                "date": "2026-07-14",
                "region": "Lyon, France"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["location_name"], "Streetlight by the park");
    assert!(body["user_id"].is_number());
}

#[tokio::test]
async fn vendors_are_grouped_by_category() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app.oneshot(get("/api/vendors")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let groups = body.as_object().unwrap();
    assert!(groups.contains_key("formicarium"));
    assert!(groups.contains_key("queens"));
    assert_eq!(groups["heating"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn forum_thread_lifecycle() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app.clone().oneshot(get("/api/forum")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/forum/getting-started/threads",
            Some("keeper"),
            json!({"title": "Test tube condensation", "content": "Is this normal?"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let thread = extract_json(response.into_body()).await;
    let thread_id = thread["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/threads/{}", thread_id),
            Some("moderator"),
            json!({"content": "Perfectly normal."}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/threads/{}", thread_id)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn locked_thread_rejects_replies() {
    let (_dir, app, pool) = setup_app().await;

    let thread_id: i64 = sqlx::query_scalar("SELECT id FROM forum_threads LIMIT 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE forum_threads SET is_locked = 1 WHERE id = ?")
        .bind(thread_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            &format!("/api/threads/{}", thread_id),
            Some("keeper"),
            json!({"content": "Late reply"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn suggestion_moderation_over_http() {
    let (_dir, app, _pool) = setup_app().await;

    // Submit as a regular keeper
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/suggestions",
            Some("keeper"),
            json!({
                "genus": "Pheidole",
                "species": "pallidula",
                "care_notes": "Warm and humid.",
                "reason": "Missing from the catalog."
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let suggestion = extract_json(response.into_body()).await;
    assert_eq!(suggestion["status"], "pending");
    let suggestion_id = suggestion["id"].as_i64().unwrap();

    // Keepers cannot list or review
    let response = app
        .clone()
        .oneshot(get_as("/api/suggestions", "keeper"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/suggestions/{}/review", suggestion_id),
            Some("keeper"),
            json!({"action": "approve"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Moderator approves; the species materializes
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/suggestions/{}/review", suggestion_id),
            Some("moderator"),
            json!({"action": "approve"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let reviewed = extract_json(response.into_body()).await;
    assert_eq!(reviewed["status"], "approved");
    assert!(reviewed["species_id"].is_number());

    let response = app
        .clone()
        .oneshot(get("/api/species/pheidole-pallidula"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Re-review is a conflict, not a silent success
    let response = app
        .oneshot(post_json(
            &format!("/api/suggestions/{}/review", suggestion_id),
            Some("moderator"),
            json!({"action": "reject"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_suggestion_submission_is_400() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app
        .oneshot(post_json(
            "/api/suggestions",
            Some("keeper"),
            json!({"genus": "", "care_notes": "", "reason": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_user_header_is_rejected() {
    let (_dir, app, _pool) = setup_app().await;

    let response = app
        .oneshot(get_as("/api/suggestions", "nobody"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
