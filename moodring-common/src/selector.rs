//! Descriptor selection: turns a tally into a short mood description
//!
//! # Policy
//! 1. Sort the non-zero counts descending and keep the first `max_results`
//!    values. Every count value in that prefix is a "top" value, so ties at
//!    the boundary pull in every bucket sharing the value.
//! 2. Qualifying buckets are ordered by count descending, then by taxonomy
//!    declaration order.
//! 3. One descriptor is drawn uniformly at random per qualifying bucket and
//!    the list is cut to `max_results`.
//!
//! Zero-count buckets never qualify: a playlist with no recognised genres
//! yields no descriptors rather than an arbitrary pick.

use crate::tally::{BucketCount, TallyResult};
use crate::taxonomy::Taxonomy;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::error;

/// Number of descriptors in a mood description unless configured otherwise
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Separator used when joining descriptors for display
pub const DESCRIPTOR_SEPARATOR: &str = ", ";

/// Pick up to `max_results` descriptor phrases for the top buckets of `tally`
///
/// `rng` drives the per-bucket descriptor draw; pass a seeded RNG for
/// reproducible output.
pub fn select<R: Rng + ?Sized>(
    taxonomy: &Taxonomy,
    tally: &TallyResult,
    max_results: usize,
    rng: &mut R,
) -> Vec<String> {
    if max_results == 0 {
        return Vec::new();
    }

    let mut top_counts: Vec<usize> = tally.iter().map(|b| b.count).filter(|&c| c > 0).collect();
    top_counts.sort_unstable_by(|a, b| b.cmp(a));
    top_counts.truncate(max_results);

    // Stable sort keeps declaration order among equal counts
    let mut qualifying: Vec<&BucketCount> = tally
        .iter()
        .filter(|b| top_counts.contains(&b.count))
        .collect();
    qualifying.sort_by(|a, b| b.count.cmp(&a.count));

    let mut descriptors = Vec::with_capacity(max_results);
    for bucket in qualifying {
        if descriptors.len() == max_results {
            break;
        }
        let Some(genre) = taxonomy.get(&bucket.meta_genre) else {
            error!(
                meta_genre = %bucket.meta_genre,
                "Tally bucket missing from taxonomy - skipping"
            );
            continue;
        };
        if let Some(descriptor) = genre.descriptors().choose(rng) {
            descriptors.push(descriptor.clone());
        }
    }

    descriptors
}

/// Join descriptors into the displayed mood description
pub fn describe<S: AsRef<str>>(descriptors: &[S]) -> String {
    descriptors
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(DESCRIPTOR_SEPARATOR)
}
