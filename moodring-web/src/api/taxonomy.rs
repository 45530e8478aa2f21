//! Taxonomy listing

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MetaGenreSummary {
    pub name: String,
    pub subgenres: usize,
    pub descriptors: usize,
}

/// GET /api/taxonomy
///
/// Meta-genres in declaration order with the size of each table.
pub async fn list_taxonomy(State(state): State<AppState>) -> Json<Vec<MetaGenreSummary>> {
    Json(
        state
            .taxonomy
            .genres()
            .iter()
            .map(|genre| MetaGenreSummary {
                name: genre.name().to_string(),
                subgenres: genre.subgenres().len(),
                descriptors: genre.descriptors().len(),
            })
            .collect(),
    )
}
