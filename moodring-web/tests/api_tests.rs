//! Integration tests for moodring-web HTTP routes
//!
//! The router is driven with `oneshot` and a stub genre source, so no
//! network access or Spotify credentials are needed.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use moodring_common::{MetaGenre, Taxonomy};
use moodring_web::spotify::{GenreSource, SpotifyError};
use moodring_web::{build_router, AppState};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt; // for `oneshot` method

/// Stub source returning canned genres and recording requested ids
struct StubSource {
    genres: Result<Vec<String>, u16>,
    requested: Mutex<Vec<String>>,
}

impl StubSource {
    fn with_genres(genres: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            genres: Ok(genres.iter().map(|g| g.to_string()).collect()),
            requested: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            genres: Err(status),
            requested: Mutex::new(Vec::new()),
        })
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenreSource for StubSource {
    fn source_id(&self) -> &'static str {
        "Stub"
    }

    async fn playlist_genres(&self, playlist_id: &str) -> Result<Vec<String>, SpotifyError> {
        self.requested.lock().unwrap().push(playlist_id.to_string());
        match &self.genres {
            Ok(genres) => Ok(genres.clone()),
            Err(status) => Err(SpotifyError::Api(*status, "stub failure".to_string())),
        }
    }
}

fn rock_rap_taxonomy() -> Taxonomy {
    Taxonomy::new(vec![
        MetaGenre::new("Rock", ["rock", "post-grunge"], ["gritty"]),
        MetaGenre::new("Rap", ["rap", "trap"], ["bold"]),
    ])
    .unwrap()
}

fn setup_app(source: Arc<StubSource>) -> axum::Router {
    let state = AppState::new(rock_rap_taxonomy(), source, 3);
    build_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_text(response).await).expect("Should parse JSON")
}

// =============================================================================
// Health and static pages
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(StubSource::with_genres(&[]));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "moodring-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_root_redirects_to_input() {
    let app = setup_app(StubSource::with_genres(&[]));

    let response = app.oneshot(get("/")).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/input");
}

#[tokio::test]
async fn test_input_page_welcomes() {
    for uri in ["/input", "/input/"] {
        let app = setup_app(StubSource::with_genres(&[]));
        let response = app.oneshot(get(uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.contains("text/html"));
        assert!(body_text(response).await.contains("Welcome!"));
    }
}

#[tokio::test]
async fn test_about_and_how_it_works_pages() {
    let app = setup_app(StubSource::with_genres(&[]));
    let response = app.oneshot(get("/about")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("About"));

    let app = setup_app(StubSource::with_genres(&[]));
    let response = app.oneshot(get("/how-it-works")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Spotify API"));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = setup_app(StubSource::with_genres(&[]));

    let response = app.oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// Form submission
// =============================================================================

#[tokio::test]
async fn test_form_renders_description_and_player() {
    let source = StubSource::with_genres(&["rock", "rock", "trap"]);
    let app = setup_app(source.clone());

    let response = app
        .oneshot(post_form(
            "/input/",
            "anything=https%3A%2F%2Fopen.spotify.com%2Fplaylist%2Fabc123%3Fsi%3Dxyz",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("gritty, bold"));
    assert!(page.contains("https://open.spotify.com/embed/playlist/abc123?utm_source=generator&amp;theme=0"));
    assert_eq!(source.requested(), vec!["abc123"]);
}

#[tokio::test]
async fn test_form_empty_input_shows_message() {
    let source = StubSource::with_genres(&["rock"]);

    for body in ["anything=", "anything=%20%20", ""] {
        let app = setup_app(source.clone());
        let response = app.oneshot(post_form("/input/", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("Please enter a valid value."));
        assert!(!page.contains("<iframe"));
    }
    assert!(source.requested().is_empty());
}

#[tokio::test]
async fn test_form_source_failure_degrades_gracefully() {
    let app = setup_app(StubSource::failing(503));

    let response = app
        .oneshot(post_form("/input/", "anything=abc123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("couldn&#39;t find any genres"));
    assert!(page.contains("/embed/playlist/abc123"));
}

// =============================================================================
// JSON API
// =============================================================================

#[tokio::test]
async fn test_json_mood_report() {
    let source = StubSource::with_genres(&["rock", "rock", "trap", "polka"]);
    let app = setup_app(source.clone());

    let response = app
        .oneshot(post_json(
            "/api/mood",
            serde_json::json!({"playlist": "spotify:playlist:abc123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["playlist_id"], "abc123");
    assert_eq!(body["description"], "gritty, bold");
    assert_eq!(body["descriptors"], serde_json::json!(["gritty", "bold"]));
    assert_eq!(body["genre_count"], 4);
    assert_eq!(body["source_error"], false);
    assert_eq!(body["tally"][0]["meta_genre"], "Rock");
    assert_eq!(body["tally"][0]["count"], 2);
    assert_eq!(body["tally"][1]["count"], 1);
}

#[tokio::test]
async fn test_json_mood_flags_source_error() {
    let app = setup_app(StubSource::failing(500));

    let response = app
        .oneshot(post_json("/api/mood", serde_json::json!({"playlist": "abc123"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["source_error"], true);
    assert_eq!(body["description"], "");
    assert_eq!(body["genre_count"], 0);
}

#[tokio::test]
async fn test_json_mood_rejects_empty_playlist() {
    let app = setup_app(StubSource::with_genres(&[]));

    let response = app
        .oneshot(post_json("/api/mood", serde_json::json!({"playlist": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_taxonomy_listing() {
    let app = setup_app(StubSource::with_genres(&[]));

    let response = app.oneshot(get("/api/taxonomy")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body[0]["name"], "Rock");
    assert_eq!(body[0]["subgenres"], 2);
    assert_eq!(body[0]["descriptors"], 1);
    assert_eq!(body[1]["name"], "Rap");
}
