//! moodring-web library - playlist mood description service
//!
//! Exposes the router and state so integration tests can drive the service
//! with a stub genre source.

use axum::Router;
use moodring_common::Taxonomy;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod mood;
pub mod playlist;
pub mod spotify;

pub use crate::error::{ApiError, ApiResult};
use crate::spotify::GenreSource;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable genre taxonomy loaded at startup
    pub taxonomy: Arc<Taxonomy>,
    /// Where playlist genres come from (Spotify in production)
    pub genre_source: Arc<dyn GenreSource>,
    /// Descriptors per mood description
    pub max_results: usize,
}

impl AppState {
    pub fn new(taxonomy: Taxonomy, genre_source: Arc<dyn GenreSource>, max_results: usize) -> Self {
        Self {
            taxonomy: Arc::new(taxonomy),
            genre_source,
            max_results,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let pages = Router::new()
        .route("/", get(api::redirect_to_input))
        .route("/input", get(api::welcome_page))
        .route("/input/", get(api::welcome_page).post(api::render_descriptors))
        .route("/about", get(api::about_page))
        .route("/how-it-works", get(api::how_it_works_page));

    let json_api = Router::new()
        .route("/api/mood", post(api::mood_json))
        .route("/api/taxonomy", get(api::list_taxonomy));

    Router::new()
        .merge(pages)
        .merge(json_api)
        .merge(api::health_routes())
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
