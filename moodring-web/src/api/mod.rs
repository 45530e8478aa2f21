//! HTTP API handlers for moodring-web

pub mod health;
pub mod mood;
pub mod pages;
pub mod taxonomy;

pub use health::health_routes;
pub use mood::{mood_json, render_descriptors};
pub use pages::{about_page, how_it_works_page, not_found, redirect_to_input, welcome_page};
pub use taxonomy::list_taxonomy;
