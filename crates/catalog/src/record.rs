//! Per-domain record adapters.
//!
//! Each dataset carries its own field names for the same concepts
//! (`rating` vs `score` vs `Rating`, `members` vs `votes`). This module
//! maps raw JSON objects onto the generic [`Entity`] shape so the query
//! engine is written once.
//!
//! Normalization rules, applied here and nowhere downstream:
//! - numeric fields accept JSON numbers or strings; strings may carry
//!   comma grouping ("1,234,567"), stripped before parsing
//! - an absent or null numeric field coerces to zero, matching the
//!   original data-preparation scripts
//! - a present but unparseable numeric field marks the record malformed
//! - a missing or empty title marks the record malformed
//!
//! Malformed records are skipped and counted, never returned.

use crate::types::{Domain, Entity};
use serde_json::{Map, Value};

/// Outcome of adapting one raw record
pub enum Adapted {
    Entity(Box<Entity>),
    /// Record was malformed; the reason is logged by the caller
    Malformed(&'static str),
}

/// Adapt a raw JSON object into the generic entity shape.
///
/// # Arguments
/// * `domain` - Which field mapping to apply
/// * `raw` - One element of the dataset's top-level JSON array
pub fn adapt(domain: Domain, mut raw: Map<String, Value>) -> Adapted {
    let mapping = FieldMapping::for_domain(domain);

    let Some(title) = take_string(&mut raw, mapping.title) else {
        return Adapted::Malformed("missing title");
    };
    if title.trim().is_empty() {
        return Adapted::Malformed("empty title");
    }

    let rating = match take_f64(&mut raw, mapping.rating) {
        Ok(value) => value,
        Err(reason) => return Adapted::Malformed(reason),
    };
    let popularity = match take_u64(&mut raw, mapping.popularity) {
        Ok(value) => value,
        Err(reason) => return Adapted::Malformed(reason),
    };
    let genres = take_tags(&mut raw, mapping.genres);

    let id = match mapping.id {
        IdSource::Field(field) => match raw.remove(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => return Adapted::Malformed("missing id"),
        },
        // Movies and series have no id column; the original dashboard
        // keyed those records by title. A year field disambiguates
        // remakes and revivals.
        IdSource::TitleWithYear(year_field) => match raw.get(year_field).and_then(Value::as_str) {
            Some(year) => format!("{} ({})", title, year),
            None => title.clone(),
        },
    };

    Adapted::Entity(Box::new(Entity {
        id,
        title,
        genres,
        rating,
        popularity,
        extra: raw,
    }))
}

/// Where an entity id comes from in the raw record
enum IdSource {
    Field(&'static str),
    /// Synthesized from the title plus the named year field
    TitleWithYear(&'static str),
}

/// Raw field names for one domain
struct FieldMapping {
    id: IdSource,
    title: &'static str,
    genres: &'static str,
    rating: &'static str,
    popularity: &'static str,
}

impl FieldMapping {
    fn for_domain(domain: Domain) -> Self {
        match domain {
            Domain::Movies => Self {
                id: IdSource::TitleWithYear("year"),
                title: "name",
                genres: "genre",
                rating: "score",
                popularity: "votes",
            },
            Domain::Anime => Self {
                id: IdSource::Field("anime_id"),
                title: "name",
                genres: "genre",
                rating: "rating",
                popularity: "members",
            },
            Domain::Manga => Self {
                id: IdSource::Field("manga_id"),
                title: "title",
                genres: "genres",
                rating: "score",
                popularity: "members",
            },
            Domain::Series => Self {
                id: IdSource::TitleWithYear("releaseYear"),
                title: "title",
                genres: "genres",
                rating: "Rating",
                popularity: "Votes",
            },
        }
    }
}

fn take_string(raw: &mut Map<String, Value>, field: &str) -> Option<String> {
    match raw.remove(field) {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            // Put non-string values back so they stay visible in `extra`
            raw.insert(field.to_string(), other);
            None
        }
        None => None,
    }
}

/// Parse a numeric JSON value, tolerating comma-grouped strings.
fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

fn take_f64(raw: &mut Map<String, Value>, field: &str) -> Result<f64, &'static str> {
    match raw.remove(field) {
        None | Some(Value::Null) => Ok(0.0),
        Some(value) => parse_number(&value).ok_or("unparseable rating"),
    }
}

fn take_u64(raw: &mut Map<String, Value>, field: &str) -> Result<u64, &'static str> {
    match raw.remove(field) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => match parse_number(&value) {
            // Fractional counts truncate toward zero
            Some(f) if f >= 0.0 => Ok(f as u64),
            _ => Err("unparseable popularity"),
        },
    }
}

/// Extract genre tags: either an array of strings or a single string
/// (the movies dataset stores one genre per record).
fn take_tags(raw: &mut Map<String, Value>, field: &str) -> Vec<String> {
    match raw.remove(field) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_adapt_anime_record() {
        let record = raw(json!({
            "anime_id": 20,
            "name": "Naruto",
            "genre": ["Action", "Adventure"],
            "type": "TV",
            "episodes": 220,
            "rating": 8.1,
            "members": 600000
        }));

        let Adapted::Entity(entity) = adapt(Domain::Anime, record) else {
            panic!("expected entity");
        };
        assert_eq!(entity.id, "20");
        assert_eq!(entity.title, "Naruto");
        assert_eq!(entity.genres, vec!["Action", "Adventure"]);
        assert_eq!(entity.rating, 8.1);
        assert_eq!(entity.popularity, 600000);
        // Display-only fields ride along
        assert_eq!(entity.attr("episodes"), Some(&json!(220)));
    }

    #[test]
    fn test_adapt_movie_comma_grouped_votes() {
        let record = raw(json!({
            "name": "The Shawshank Redemption",
            "year": "1994",
            "score": "9.3",
            "votes": "2,343,110",
            "genre": "Drama",
            "director": "Frank Darabont"
        }));

        let Adapted::Entity(entity) = adapt(Domain::Movies, record) else {
            panic!("expected entity");
        };
        assert_eq!(entity.id, "The Shawshank Redemption (1994)");
        assert_eq!(entity.rating, 9.3);
        assert_eq!(entity.popularity, 2_343_110);
        assert_eq!(entity.genres, vec!["Drama"]);
    }

    #[test]
    fn test_adapt_series_null_rating_coerces_to_zero() {
        let record = raw(json!({
            "title": "Obscure Show",
            "genres": ["Drama"],
            "releaseYear": "2019",
            "Rating": null,
            "Votes": 1200.0
        }));

        let Adapted::Entity(entity) = adapt(Domain::Series, record) else {
            panic!("expected entity");
        };
        assert_eq!(entity.id, "Obscure Show (2019)");
        assert_eq!(entity.rating, 0.0);
        assert_eq!(entity.popularity, 1200);
    }

    #[test]
    fn test_adapt_rejects_missing_title() {
        let record = raw(json!({ "anime_id": 1, "rating": 8.0, "members": 100 }));
        assert!(matches!(
            adapt(Domain::Anime, record),
            Adapted::Malformed("missing title")
        ));
    }

    #[test]
    fn test_adapt_rejects_unparseable_rating() {
        let record = raw(json!({
            "anime_id": 1,
            "name": "Broken",
            "rating": "N/A",
            "members": 100
        }));
        assert!(matches!(
            adapt(Domain::Anime, record),
            Adapted::Malformed("unparseable rating")
        ));
    }

    #[test]
    fn test_adapt_rejects_negative_popularity() {
        let record = raw(json!({
            "anime_id": 1,
            "name": "Broken",
            "rating": 8.0,
            "members": -5
        }));
        assert!(matches!(
            adapt(Domain::Anime, record),
            Adapted::Malformed("unparseable popularity")
        ));
    }
}
