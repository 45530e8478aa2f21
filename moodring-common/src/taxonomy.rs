//! Genre taxonomy: meta-genre buckets, their sub-genres and descriptor phrases
//!
//! The taxonomy is loaded once at startup and shared read-only. Each
//! [`MetaGenre`] carries both its sub-genre set and its descriptor list, so
//! the bucket table and the descriptor bank cannot disagree about which
//! meta-genres exist. Anything that would leave a bucket without a
//! descriptor is rejected at load time.
//!
//! # Format
//! ```toml
//! [[meta_genre]]
//! name = "Rock"
//! subgenres = ["rock", "post-grunge"]
//! descriptors = ["gritty"]
//! ```

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Taxonomy shipped with the binary
const BUILTIN_TAXONOMY: &str = include_str!("../data/taxonomy.toml");

/// One meta-genre bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaGenre {
    name: String,
    subgenres: HashSet<String>,
    descriptors: Vec<String>,
}

impl MetaGenre {
    pub fn new<S, D>(name: impl Into<String>, subgenres: S, descriptors: D) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            name: name.into(),
            subgenres: subgenres.into_iter().map(Into::into).collect(),
            descriptors: descriptors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subgenres(&self) -> &HashSet<String> {
        &self.subgenres
    }

    /// Candidate descriptor phrases, in declaration order (never empty once validated)
    pub fn descriptors(&self) -> &[String] {
        &self.descriptors
    }

    pub fn contains(&self, subgenre: &str) -> bool {
        self.subgenres.contains(subgenre)
    }
}

/// On-disk shape of a taxonomy document
#[derive(Debug, Deserialize)]
struct TaxonomyDocument {
    #[serde(rename = "meta_genre", default)]
    meta_genres: Vec<MetaGenreEntry>,
}

#[derive(Debug, Deserialize)]
struct MetaGenreEntry {
    name: String,
    #[serde(default)]
    subgenres: Vec<String>,
    #[serde(default)]
    descriptors: Vec<String>,
}

/// Validated, immutable genre taxonomy
#[derive(Debug, Clone)]
pub struct Taxonomy {
    genres: Vec<MetaGenre>,
    /// sub-genre -> indices into `genres`, ascending
    index: HashMap<String, Vec<usize>>,
}

impl Taxonomy {
    /// Build a taxonomy from meta-genres in declaration order
    ///
    /// Fails with [`Error::Config`] when the table is empty, a name is blank
    /// or duplicated, or a meta-genre has no usable descriptor.
    pub fn new(genres: Vec<MetaGenre>) -> Result<Self> {
        if genres.is_empty() {
            return Err(Error::Config(
                "taxonomy must define at least one meta-genre".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for genre in &genres {
            if genre.name.trim().is_empty() {
                return Err(Error::Config("meta-genre with an empty name".to_string()));
            }
            if !seen.insert(genre.name.as_str()) {
                return Err(Error::Config(format!(
                    "meta-genre '{}' is defined more than once",
                    genre.name
                )));
            }
            if genre.descriptors.is_empty() {
                return Err(Error::Config(format!(
                    "meta-genre '{}' has no descriptors",
                    genre.name
                )));
            }
            if genre.descriptors.iter().any(|d| d.trim().is_empty()) {
                return Err(Error::Config(format!(
                    "meta-genre '{}' has a blank descriptor",
                    genre.name
                )));
            }
        }

        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, genre) in genres.iter().enumerate() {
            for subgenre in &genre.subgenres {
                index.entry(subgenre.clone()).or_default().push(position);
            }
        }

        debug!(
            meta_genres = genres.len(),
            subgenres = index.len(),
            "Taxonomy index built"
        );

        Ok(Self { genres, index })
    }

    /// Taxonomy compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_TAXONOMY)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: TaxonomyDocument = toml::from_str(content)?;
        let genres = document
            .meta_genres
            .into_iter()
            .map(|entry| MetaGenre::new(entry.name, entry.subgenres, entry.descriptors))
            .collect();
        Self::new(genres)
    }

    /// Load a taxonomy document from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let taxonomy = Self::from_toml_str(&content)?;
        info!(
            "Loaded taxonomy from {} ({} meta-genres)",
            path.display(),
            taxonomy.len()
        );
        Ok(taxonomy)
    }

    /// Load from `path` when given, otherwise the built-in table
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    /// Meta-genres in declaration order
    pub fn genres(&self) -> &[MetaGenre] {
        &self.genres
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MetaGenre> {
        self.genres.iter().find(|g| g.name == name)
    }

    /// Positions of every meta-genre containing `subgenre`
    pub fn buckets_for(&self, subgenre: &str) -> &[usize] {
        self.index.get(subgenre).map(Vec::as_slice).unwrap_or(&[])
    }
}
