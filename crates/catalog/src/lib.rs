//! # Catalog Crate
//!
//! This crate handles loading and normalizing the CineViz datasets
//! (movies, anime, manga, TV series) into a single generic record
//! shape the query engine can operate on.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Entity, Domain, Catalog, Library)
//! - **record**: Per-domain adapters mapping raw JSON fields onto the
//!   generic shape, with load-time numeric normalization
//! - **loader**: Dataset file loading, parallel across domains
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{Domain, Library};
//! use std::path::Path;
//!
//! let library = Library::load_from_dir(Path::new("data"))?;
//! let anime = library.catalog(Domain::Anime);
//!
//! println!("{} anime loaded, {} skipped", anime.len(), anime.skipped());
//! ```
//!
//! The collection is immutable after loading: every entity is adapted
//! exactly once, malformed records are dropped (and counted) here, and
//! nothing downstream ever re-parses or coerces a field.

// Public modules
pub mod error;
pub mod loader;
pub mod record;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{Catalog, Domain, Entity, EntityId, Library};
