//! Genre tally: counts how many of a playlist's sub-genres fall into each
//! meta-genre bucket.
//!
//! A tally is built fresh for every request and covers every bucket of the
//! taxonomy, zero counts included, in the taxonomy's declaration order.

use crate::taxonomy::Taxonomy;
use serde::Serialize;

/// Count for a single meta-genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub meta_genre: String,
    pub count: usize,
}

/// Per-meta-genre occurrence counts for one playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TallyResult {
    buckets: Vec<BucketCount>,
}

impl TallyResult {
    /// All-zero tally over every bucket of `taxonomy`
    pub fn zeroed(taxonomy: &Taxonomy) -> Self {
        Self {
            buckets: taxonomy
                .genres()
                .iter()
                .map(|genre| BucketCount {
                    meta_genre: genre.name().to_string(),
                    count: 0,
                })
                .collect(),
        }
    }

    /// Buckets in taxonomy declaration order
    pub fn iter(&self) -> impl Iterator<Item = &BucketCount> {
        self.buckets.iter()
    }

    pub fn get(&self, meta_genre: &str) -> Option<usize> {
        self.buckets
            .iter()
            .find(|b| b.meta_genre == meta_genre)
            .map(|b| b.count)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all bucket counts
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// True when no sub-genre matched any bucket
    pub fn is_all_zero(&self) -> bool {
        self.buckets.iter().all(|b| b.count == 0)
    }
}

/// Tally `subgenres` against `taxonomy`
///
/// Every input label adds one to each bucket that contains it; labels that
/// match no bucket are ignored. Never fails, including for empty input.
pub fn tally<S: AsRef<str>>(taxonomy: &Taxonomy, subgenres: &[S]) -> TallyResult {
    let mut result = TallyResult::zeroed(taxonomy);

    for subgenre in subgenres {
        for &position in taxonomy.buckets_for(subgenre.as_ref()) {
            result.buckets[position].count += 1;
        }
    }

    tracing::debug!(
        inputs = subgenres.len(),
        matched = result.total(),
        "Genre tally complete"
    );

    result
}
