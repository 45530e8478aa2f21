//! Playlist genre extraction
//!
//! [`GenreSource`] is the boundary between the mood pipeline and the music
//! metadata provider. The production implementation is [`SpotifyClient`];
//! tests plug in stubs with canned genre lists.
//!
//! [`extract`] applies the fail-closed policy: any error from the source
//! yields an empty genre list for the request, and partial results are
//! discarded.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

pub mod client;
pub mod models;

pub use client::SpotifyClient;

/// Spotify Web API errors
#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Source of artist genres for a playlist
#[async_trait]
pub trait GenreSource: Send + Sync {
    /// Source identifier used in logs (e.g. "Spotify")
    fn source_id(&self) -> &'static str;

    /// Genres of the first listed artist of every track, flattened in track order
    async fn playlist_genres(&self, playlist_id: &str) -> Result<Vec<String>, SpotifyError>;
}

/// Outcome of one extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Flattened sub-genres; empty when the source failed
    pub genres: Vec<String>,
    /// Error message when the source failed
    pub error: Option<String>,
}

impl Extraction {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetch the playlist's genres, collapsing any failure to an empty list
pub async fn extract(source: &dyn GenreSource, playlist_id: &str) -> Extraction {
    match source.playlist_genres(playlist_id).await {
        Ok(genres) => {
            info!(
                source = source.source_id(),
                playlist_id = %playlist_id,
                genres = genres.len(),
                "Extracted playlist genres"
            );
            Extraction {
                genres,
                error: None,
            }
        }
        Err(e) => {
            warn!(
                source = source.source_id(),
                playlist_id = %playlist_id,
                error = %e,
                "Genre extraction failed - continuing with no genres"
            );
            Extraction {
                genres: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}
