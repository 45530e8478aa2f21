//! Spotify Web API client
//!
//! Authenticates with the client-credentials flow and reads playlist tracks
//! and artist genres. The access token is reused until shortly before it
//! expires; nothing else is kept between requests.

use super::models::{ArtistsResponse, PlaylistTracksPage, TokenResponse};
use super::{GenreSource, SpotifyError};
use async_trait::async_trait;
use moodring_common::config::SpotifyConfig;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const USER_AGENT: &str = concat!("moodring/", env!("CARGO_PKG_VERSION"));
/// Refresh the token this long before Spotify says it expires
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);
const PLAYLIST_PAGE_LIMIT: u32 = 100;
/// Spotify caps playlists at 10,000 tracks
const MAX_PLAYLIST_PAGES: usize = 100;
const ARTIST_BATCH_SIZE: usize = 50;
const PLAYLIST_FIELDS: &str = "next,items(track(artists(id)))";

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    config: SpotifyConfig,
    token: Mutex<Option<AccessToken>>,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig, timeout: Duration) -> Result<Self, SpotifyError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
            token: Mutex::new(None),
        })
    }

    /// Current access token, requesting a new one when missing or stale
    async fn access_token(&self) -> Result<String, SpotifyError> {
        let mut token = self.token.lock().await;

        if let Some(current) = token.as_ref().filter(|t| t.is_fresh()) {
            return Ok(current.value.clone());
        }

        let fresh = self.request_token().await?;
        let value = fresh.value.clone();
        *token = Some(fresh);
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken, SpotifyError> {
        let url = format!("{}/api/token", self.config.accounts_base);
        tracing::debug!(url = %url, "Requesting Spotify access token");

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Auth(format!("{}: {}", status.as_u16(), error_text)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SpotifyError::Parse(e.to_string()))?;

        tracing::info!(expires_in = token.expires_in, "Obtained Spotify access token");

        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }

    /// Authenticated GET decoding a JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SpotifyError> {
        let token = self.access_token().await?;

        tracing::debug!(url = %url, "Querying Spotify API");

        let response = self
            .http_client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            // Token revoked or expired early; force a refresh next time
            *self.token.lock().await = None;
            return Err(SpotifyError::Auth("access token rejected".to_string()));
        }

        if status == 404 {
            return Err(SpotifyError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| SpotifyError::Parse(e.to_string()))
    }

    /// First listed artist id of every track, in playlist order
    ///
    /// Removed tracks, episodes and local files have no artist id and are
    /// skipped.
    pub async fn playlist_first_artists(&self, playlist_id: &str) -> Result<Vec<String>, SpotifyError> {
        if playlist_id.is_empty() || !playlist_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SpotifyError::NotFound(format!("playlist '{}'", playlist_id)));
        }

        let first_url = format!("{}/playlists/{}/tracks", self.config.api_base, playlist_id);
        let limit = PLAYLIST_PAGE_LIMIT.to_string();
        let mut page: PlaylistTracksPage = self
            .get_json(&first_url, &[("fields", PLAYLIST_FIELDS), ("limit", limit.as_str())])
            .await?;

        let mut artist_ids = Vec::new();
        let mut pages = 1;
        loop {
            artist_ids.extend(
                page.items
                    .iter()
                    .filter_map(|item| item.first_artist_id())
                    .map(str::to_string),
            );

            let Some(next) = page.next.take() else {
                break;
            };
            if pages >= MAX_PLAYLIST_PAGES {
                tracing::warn!(playlist_id = %playlist_id, "Playlist page limit reached");
                break;
            }
            // `next` already carries offset, limit and fields
            page = self.get_json(&next, &[]).await?;
            pages += 1;
        }

        tracing::debug!(
            playlist_id = %playlist_id,
            pages,
            tracks = artist_ids.len(),
            "Read playlist tracks"
        );

        Ok(artist_ids)
    }

    /// Genre lists for the given artist ids
    ///
    /// Any id Spotify does not recognise fails the whole lookup.
    pub async fn artist_genres(
        &self,
        artist_ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>, SpotifyError> {
        let url = format!("{}/artists", self.config.api_base);
        let mut genres = HashMap::with_capacity(artist_ids.len());

        for batch in artist_ids.chunks(ARTIST_BATCH_SIZE) {
            let ids = batch.join(",");
            let response: ArtistsResponse = self.get_json(&url, &[("ids", ids.as_str())]).await?;

            for (requested, artist) in batch.iter().zip(response.artists) {
                let artist =
                    artist.ok_or_else(|| SpotifyError::NotFound(format!("artist '{}'", requested)))?;
                genres.insert(requested.clone(), artist.genres);
            }
        }

        Ok(genres)
    }
}

#[async_trait]
impl GenreSource for SpotifyClient {
    fn source_id(&self) -> &'static str {
        "Spotify"
    }

    async fn playlist_genres(&self, playlist_id: &str) -> Result<Vec<String>, SpotifyError> {
        let artist_ids = self.playlist_first_artists(playlist_id).await?;

        let mut seen = HashSet::new();
        let unique: Vec<String> = artist_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();
        let lookup = self.artist_genres(&unique).await?;

        let mut flattened = Vec::new();
        for id in &artist_ids {
            let artist_genres = lookup
                .get(id)
                .ok_or_else(|| SpotifyError::NotFound(format!("artist '{}'", id)))?;
            flattened.extend(artist_genres.iter().cloned());
        }

        Ok(flattened)
    }
}
