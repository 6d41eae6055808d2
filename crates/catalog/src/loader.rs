//! Dataset loading.
//!
//! Loading happens once per session:
//! 1. Read each domain's JSON dataset file
//! 2. Adapt raw records onto the generic entity shape, skipping and
//!    counting malformed ones
//! 3. Validate integrity (unique ids)
//!
//! The four domain files are parsed in parallel with nested
//! `rayon::join`, since each parse is independent CPU-bound work.

use crate::error::{CatalogError, Result};
use crate::record::{self, Adapted};
use crate::types::{Catalog, Domain, Entity, Library};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

impl Catalog {
    /// Parse a catalog from raw JSON text.
    ///
    /// The text must be a JSON array of objects. Malformed records are
    /// dropped and counted; only structural problems (not-an-array,
    /// invalid JSON, duplicate ids) are errors.
    pub fn from_json_str(domain: Domain, text: &str, file_label: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|source| CatalogError::JsonError {
                file: file_label.to_string(),
                source,
            })?;

        let Value::Array(records) = value else {
            return Err(CatalogError::NotAnArray {
                file: file_label.to_string(),
            });
        };

        let mut entities: Vec<Entity> = Vec::with_capacity(records.len());
        let mut skipped = 0usize;

        for (position, record) in records.into_iter().enumerate() {
            let Value::Object(raw) = record else {
                skipped += 1;
                debug!(file = file_label, position, "skipping non-object record");
                continue;
            };
            match record::adapt(domain, raw) {
                Adapted::Entity(entity) => entities.push(*entity),
                Adapted::Malformed(reason) => {
                    skipped += 1;
                    debug!(file = file_label, position, reason, "skipping malformed record");
                }
            }
        }

        if skipped > 0 {
            warn!(
                file = file_label,
                skipped,
                kept = entities.len(),
                "dropped malformed records during load"
            );
        }

        let catalog = Catalog::new(domain, entities, skipped);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load one domain's catalog from its dataset file.
    pub fn load_from_file(domain: Domain, path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                CatalogError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                CatalogError::IoError(err)
            }
        })?;
        Self::from_json_str(domain, &text, &path.display().to_string())
    }
}

impl Library {
    /// Load all four domain catalogs from a data directory.
    ///
    /// # Arguments
    /// * `data_dir` - Directory containing the four `*_data.json` files
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!(dir = %data_dir.display(), "loading catalog datasets");

        let load = |domain: Domain| {
            Catalog::load_from_file(domain, &data_dir.join(domain.dataset_file()))
        };

        // Nested joins give four-way parallelism over the dataset files
        let ((movies, anime), (manga, series)) = rayon::join(
            || rayon::join(|| load(Domain::Movies), || load(Domain::Anime)),
            || rayon::join(|| load(Domain::Manga), || load(Domain::Series)),
        );

        let library = Library {
            movies: movies?,
            anime: anime?,
            manga: manga?,
            series: series?,
        };

        let (total, skipped) = library.counts();
        info!(total, skipped, "catalog datasets loaded");
        Ok(library)
    }
}
