//! Core domain types for the CineViz datasets.
//!
//! Every domain (movies, anime, manga, TV series) is mapped onto the
//! same generic [`Entity`] shape at load time, so the query engine is
//! written once against one record layout. Domain-specific attributes
//! that the engine never ranks on (episodes, director, budget, ...) are
//! carried opaquely in `extra` for display.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque unique identifier for an entity, stable per record.
///
/// Anime and manga ids are numeric in the source data, movies and
/// series are keyed by title; both are carried as strings.
pub type EntityId = String;

// =============================================================================
// Domain
// =============================================================================

/// The four catalog domains served by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Movies,
    Anime,
    Manga,
    Series,
}

impl Domain {
    /// File name of this domain's dataset inside the data directory.
    ///
    /// Names match the output of the original data-preparation scripts.
    pub fn dataset_file(&self) -> &'static str {
        match self {
            Domain::Movies => "movies_data.json",
            Domain::Anime => "anime_data.json",
            Domain::Manga => "manga_data.json",
            Domain::Series => "series_data.json",
        }
    }

}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Movies => "movies",
            Domain::Anime => "anime",
            Domain::Manga => "manga",
            Domain::Series => "series",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Entity
// =============================================================================

/// A single catalog record in the generic shape shared by all domains.
///
/// Only `id`, `title`, `genres`, `rating` and `popularity` take part in
/// search and ranking; everything else rides along in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub title: String,
    /// Category tags as stored in the source data. May contain
    /// duplicates; overlap comparisons treat the list as a set.
    pub genres: Vec<String>,
    /// Quality score on the domain's own scale (0-10 for all four
    /// shipped datasets).
    pub rating: f64,
    /// Audience-size proxy: members for anime/manga, votes for
    /// movies/series.
    pub popularity: u64,
    /// Display-only attributes, passed through untouched.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl Entity {
    /// Look up a display attribute by source field name.
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// An immutable collection of entities for one domain.
///
/// Built once at load time and never mutated afterwards; the engine
/// only ever borrows `entities()`.
#[derive(Debug)]
pub struct Catalog {
    domain: Domain,
    entities: Vec<Entity>,
    /// Number of malformed source records dropped during loading
    skipped: usize,
}

impl Catalog {
    /// Assemble a catalog from already-adapted entities.
    ///
    /// `skipped` is the count of source records rejected by the adapter;
    /// it is surfaced so callers can log data quality without the load
    /// aborting.
    pub fn new(domain: Domain, entities: Vec<Entity>, skipped: usize) -> Self {
        Self {
            domain,
            entities,
            skipped,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// All valid entities, in source order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Get an entity by id
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of malformed records dropped at load time
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Check integrity invariants: every id unique within the catalog.
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.entities.len());
        for entity in &self.entities {
            if !seen.insert(entity.id.as_str()) {
                return Err(crate::error::CatalogError::DuplicateId {
                    domain: self.domain.to_string(),
                    id: entity.id.clone(),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Library
// =============================================================================

/// All four domain catalogs for one dashboard session.
#[derive(Debug)]
pub struct Library {
    pub movies: Catalog,
    pub anime: Catalog,
    pub manga: Catalog,
    pub series: Catalog,
}

impl Library {
    /// Get the catalog for a domain
    pub fn catalog(&self, domain: Domain) -> &Catalog {
        match domain {
            Domain::Movies => &self.movies,
            Domain::Anime => &self.anime,
            Domain::Manga => &self.manga,
            Domain::Series => &self.series,
        }
    }

    /// (entities, skipped) totals across all domains, for logging
    pub fn counts(&self) -> (usize, usize) {
        let catalogs = [&self.movies, &self.anime, &self.manga, &self.series];
        let total = catalogs.iter().map(|c| c.len()).sum();
        let skipped = catalogs.iter().map(|c| c.skipped()).sum();
        (total, skipped)
    }
}
