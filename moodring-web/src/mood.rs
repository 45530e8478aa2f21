//! Mood report: extraction → tally → descriptor selection for one playlist

use crate::playlist::embed_url;
use crate::spotify::{extract, Extraction};
use crate::AppState;
use moodring_common::tally::tally;
use moodring_common::{describe, select, TallyResult, Taxonomy};
use rand::Rng;
use serde::Serialize;

/// Everything the views need about one playlist
#[derive(Debug, Clone, Serialize)]
pub struct MoodReport {
    pub playlist_id: String,
    pub embed_url: String,
    /// Descriptors joined for display; empty when no genre was recognised
    pub description: String,
    pub descriptors: Vec<String>,
    pub tally: TallyResult,
    /// Number of sub-genres the source reported
    pub genre_count: usize,
    /// True when the genre source failed and the report is built from nothing
    pub source_error: bool,
}

impl MoodReport {
    pub fn has_description(&self) -> bool {
        !self.descriptors.is_empty()
    }
}

/// Build a report from an extraction
pub fn build_report<R: Rng + ?Sized>(
    taxonomy: &Taxonomy,
    max_results: usize,
    playlist_id: &str,
    extraction: &Extraction,
    rng: &mut R,
) -> MoodReport {
    let counts = tally(taxonomy, &extraction.genres);
    let descriptors = select(taxonomy, &counts, max_results, rng);

    MoodReport {
        playlist_id: playlist_id.to_string(),
        embed_url: embed_url(playlist_id),
        description: describe(&descriptors),
        descriptors,
        tally: counts,
        genre_count: extraction.genres.len(),
        source_error: extraction.failed(),
    }
}

/// Run the full pipeline for a parsed playlist id
pub async fn generate(state: &AppState, playlist_id: &str) -> MoodReport {
    let extraction = extract(state.genre_source.as_ref(), playlist_id).await;

    let report = build_report(
        &state.taxonomy,
        state.max_results,
        playlist_id,
        &extraction,
        &mut rand::thread_rng(),
    );

    tracing::info!(
        playlist_id = %playlist_id,
        genres = report.genre_count,
        description = %report.description,
        "Generated mood description"
    );

    report
}
