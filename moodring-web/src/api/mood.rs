//! Mood description endpoints

use axum::{extract::State, response::Html, Form, Json};
use serde::Deserialize;
use tracing::debug;

use super::pages::{render_index, INVALID_INPUT_MESSAGE, NO_GENRES_MESSAGE};
use crate::error::{ApiError, ApiResult};
use crate::mood::{generate, MoodReport};
use crate::playlist::parse_playlist_id;
use crate::AppState;

/// Form body of the input page
#[derive(Debug, Deserialize)]
pub struct MoodForm {
    /// Playlist id, share URL or URI
    #[serde(default)]
    pub anything: String,
}

/// JSON request body for `/api/mood`
#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    pub playlist: String,
}

/// POST /input/
///
/// Describes the submitted playlist. Bad input is reported on the page.
pub async fn render_descriptors(
    State(state): State<AppState>,
    Form(form): Form<MoodForm>,
) -> Html<String> {
    let Some(playlist_id) = parse_playlist_id(&form.anything) else {
        debug!(input = %form.anything, "Rejected empty playlist input");
        return render_index(INVALID_INPUT_MESSAGE, None);
    };

    let report = generate(&state, &playlist_id).await;

    let message = if report.has_description() {
        report.description.as_str()
    } else {
        NO_GENRES_MESSAGE
    };
    render_index(message, Some(report.embed_url.as_str()))
}

/// POST /api/mood
///
/// JSON variant returning the full report.
pub async fn mood_json(
    State(state): State<AppState>,
    Json(request): Json<MoodRequest>,
) -> ApiResult<Json<MoodReport>> {
    let playlist_id = parse_playlist_id(&request.playlist).ok_or_else(|| {
        ApiError::BadRequest("playlist must be a Spotify playlist id, URL or URI".to_string())
    })?;

    Ok(Json(generate(&state, &playlist_id).await))
}
