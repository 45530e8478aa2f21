//! # Moodring Common Library
//!
//! Shared code for the moodring service:
//! - Genre taxonomy (meta-genre buckets and their descriptor phrases)
//! - Genre tally over a playlist's sub-genres
//! - Descriptor selection for the mood description
//! - Configuration loading
//! - Error types

pub mod config;
pub mod error;
pub mod selector;
pub mod tally;
pub mod taxonomy;

pub use error::{Error, Result};
pub use selector::{describe, select, DEFAULT_MAX_RESULTS};
pub use tally::{BucketCount, TallyResult};
pub use taxonomy::{MetaGenre, Taxonomy};
