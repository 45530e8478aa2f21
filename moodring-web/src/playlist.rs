//! Playlist identifier handling
//!
//! Users paste a bare id, a share URL
//! (`https://open.spotify.com/playlist/<id>?si=...`) or a URI
//! (`spotify:playlist:<id>`). All three reduce to the bare id.

const EMBED_BASE: &str = "https://open.spotify.com/embed/playlist";

/// Extract the playlist id from user input
///
/// Strips one trailing slash, keeps the last path segment, drops any query
/// string, then keeps the part after the last `:`. Returns `None` when
/// nothing is left.
pub fn parse_playlist_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    let segment = trimmed.rsplit('/').next().unwrap_or_default();
    let segment = segment.split('?').next().unwrap_or_default();
    let id = segment.rsplit(':').next().unwrap_or_default();

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Embeddable player URL for a playlist
pub fn embed_url(playlist_id: &str) -> String {
    format!(
        "{}/{}?utm_source=generator&theme=0",
        EMBED_BASE, playlist_id
    )
}
