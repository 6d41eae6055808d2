//! Search resolution: partial title match ranked by match position.
//!
//! The dashboard search box resolves a free-text term to the single
//! best-matching entity. Matching is a case-insensitive substring test
//! against the title; earlier occurrences of the term rank higher, and
//! ties break alphabetically on the lower-cased title.

use catalog::Entity;
use tracing::debug;

/// All entities matching `term`, best match first.
///
/// ## Algorithm
/// 1. Trim and lower-case the term; an empty term matches nothing
/// 2. Keep entities whose lower-cased title contains the term
/// 3. Sort by first-occurrence index of the term, then by lower-cased
///    title
///
/// Pure function of its inputs; repeated calls over the same collection
/// return the same ordering.
pub fn matches<'a>(entities: &'a [Entity], term: &str) -> Vec<&'a Entity> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(usize, String, &Entity)> = entities
        .iter()
        .filter_map(|entity| {
            let title = entity.title.to_lowercase();
            title.find(&term).map(|index| (index, title, entity))
        })
        .collect();

    ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    debug!(term = %term, matched = ranked.len(), "ranked search candidates");
    ranked.into_iter().map(|(_, _, entity)| entity).collect()
}

/// The best-matching entity for `term`, if any.
///
/// `None` is the ordinary no-match outcome (including an empty or
/// all-whitespace term), not a fault.
pub fn resolve<'a>(entities: &'a [Entity], term: &str) -> Option<&'a Entity> {
    matches(entities, term).into_iter().next()
}
