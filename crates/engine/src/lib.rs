//! # Engine Crate
//!
//! The catalog query engine behind the CineViz dashboard views:
//!
//! - **search**: resolve a partial, case-insensitive title search to
//!   the single best-matching entity
//! - **policy** / **recommend**: rank recommendation candidates by
//!   genre affinity and quality, draw one pick from the shortlist
//! - **aggregate**: per-tag counts and top-N listings for charts
//!
//! ## Architecture
//!
//! Every operation is a pure function over `&[Entity]`: the engine
//! retains no state between calls, and the collection is never mutated.
//! Query parameters arrive as explicit values ([`Policy`], search
//! terms, sort modes) owned by the presentation layer. The only
//! observable nondeterminism is the `Random` selection mode, and the
//! random source is injectable through [`recommend_with`].
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::{resolve, recommend, Policy};
//!
//! let anchor = resolve(catalog.entities(), "Naru");
//! if let Some(anchor) = anchor {
//!     let pick = recommend(catalog.entities(), anchor, &Policy::default())?;
//! }
//! ```

pub mod aggregate;
pub mod policy;
pub mod recommend;
pub mod search;

// Re-export main types and operations
pub use aggregate::{TagSort, present, tag_counts, top_rated};
pub use policy::{Policy, PolicyError, Selection};
pub use recommend::{recommend, recommend_with, shortlist};
pub use search::{matches, resolve};
