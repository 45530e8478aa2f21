//! Spotify Web API response shapes (only the fields moodring reads)

use serde::Deserialize;

/// Client-credentials token response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

/// One page of `GET /playlists/{id}/tracks`
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    /// Absolute URL of the next page, if any
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    /// `null` for tracks removed from the catalogue
    pub track: Option<PlaylistTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrack {
    /// Episodes carry no artists
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    /// `null` for local files
    pub id: Option<String>,
}

impl PlaylistItem {
    /// Id of the track's first listed artist, when there is one
    pub fn first_artist_id(&self) -> Option<&str> {
        self.track
            .as_ref()?
            .artists
            .first()?
            .id
            .as_deref()
    }
}

/// `GET /artists?ids=...`
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistsResponse {
    /// Unknown ids come back as `null`
    pub artists: Vec<Option<Artist>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub genres: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_artist_id_skips_removed_and_local() {
        let page: PlaylistTracksPage = serde_json::from_str(
            r#"{
                "items": [
                    {"track": {"artists": [{"id": "a1"}, {"id": "a2"}]}},
                    {"track": null},
                    {"track": {"artists": [{"id": null}]}},
                    {"track": {"artists": []}},
                    {"track": {}}
                ],
                "next": null
            }"#,
        )
        .unwrap();

        let ids: Vec<Option<&str>> = page.items.iter().map(|i| i.first_artist_id()).collect();
        assert_eq!(ids, vec![Some("a1"), None, None, None, None]);
        assert!(page.next.is_none());
    }

    #[test]
    fn test_artists_response_with_null_entry() {
        let response: ArtistsResponse = serde_json::from_str(
            r#"{"artists": [{"id": "a1", "name": "A", "genres": ["k-pop"]}, null]}"#,
        )
        .unwrap();

        assert_eq!(response.artists.len(), 2);
        assert_eq!(response.artists[0].as_ref().unwrap().genres, vec!["k-pop"]);
        assert!(response.artists[1].is_none());
    }
}
