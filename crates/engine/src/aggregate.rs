//! Tag aggregation and presentation helpers.
//!
//! Chart components consume (tag, count) pairs; how they are sorted,
//! filtered, or truncated is a presentation choice applied to a copy,
//! never to the underlying counts.

use catalog::Entity;
use std::collections::HashMap;

/// Count tag occurrences across a collection.
///
/// `extract` picks the tag list off each entity (usually its genres).
/// Pairs come back in first-seen order; callers apply their own sort.
pub fn tag_counts<'a, F>(entities: &'a [Entity], extract: F) -> Vec<(String, u64)>
where
    F: Fn(&'a Entity) -> &'a [String],
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();

    for entity in entities {
        for tag in extract(entity) {
            match counts.get_mut(tag.as_str()) {
                Some(count) => *count += 1,
                None => {
                    order.push(tag.clone());
                    counts.insert(tag.as_str(), 1);
                }
            }
        }
    }

    order
        .into_iter()
        .map(|tag| {
            let count = counts[tag.as_str()];
            (tag, count)
        })
        .collect()
}

/// Presentation-side ordering of aggregated pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSort {
    /// Highest count first, ties alphabetical
    CountDesc,
    Alphabetical,
}

/// Sort, filter, and truncate aggregated pairs for display.
///
/// # Arguments
/// * `filter` - Case-insensitive substring match on the tag name
/// * `top_n` - Keep at most this many pairs after sorting
///
/// Returns a new vector; the input counts are left untouched.
pub fn present(
    counts: &[(String, u64)],
    sort: TagSort,
    filter: Option<&str>,
    top_n: Option<usize>,
) -> Vec<(String, u64)> {
    let needle = filter.map(str::to_lowercase);

    let mut selected: Vec<(String, u64)> = counts
        .iter()
        .filter(|(tag, _)| match &needle {
            Some(needle) => tag.to_lowercase().contains(needle),
            None => true,
        })
        .cloned()
        .collect();

    match sort {
        TagSort::CountDesc => {
            selected.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        }
        TagSort::Alphabetical => selected.sort_by(|a, b| a.0.cmp(&b.0)),
    }

    if let Some(top_n) = top_n {
        selected.truncate(top_n);
    }
    selected
}

/// Top-rated entities above a popularity floor.
///
/// Mirrors the dashboard's "top N by rating, minimum members" chart:
/// popularity floor, rating-descending sort, truncate.
pub fn top_rated<'a>(
    entities: &'a [Entity],
    min_popularity: u64,
    limit: usize,
) -> Vec<&'a Entity> {
    let mut qualified: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.popularity >= min_popularity)
        .collect();
    qualified.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.popularity.cmp(&a.popularity))
    });
    qualified.truncate(limit);
    qualified
}
