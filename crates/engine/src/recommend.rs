//! Recommendation ranking.
//!
//! Given an anchor entity (the user's resolved search result) and a
//! [`Policy`], rank the rest of the collection by genre affinity and
//! quality, then draw one pick from the top-K shortlist.
//!
//! ## Algorithm
//! 1. Validate the policy (fail fast, before any scan)
//! 2. Exclude the anchor itself by id
//! 3. If required, keep candidates sharing at least one genre tag with
//!    the anchor
//! 4. Keep candidates meeting the rating and popularity floors
//! 5. Rank by distinct-genre-overlap count desc, rating desc,
//!    popularity desc; each criterion only breaks ties in the previous
//! 6. Truncate to `top_k`; pick the head (`Best`) or a uniformly
//!    random element (`Random`)
//!
//! An empty shortlist is the ordinary no-recommendation outcome, not a
//! fault.

use crate::policy::{Policy, PolicyError, Selection};
use catalog::Entity;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

/// The ranked, truncated candidate list for an anchor under a policy.
///
/// Exposed separately from [`recommend`] so callers can display the
/// shortlist itself (and so the ranking laws are directly testable).
pub fn shortlist<'a>(
    entities: &'a [Entity],
    anchor: &Entity,
    policy: &Policy,
) -> Result<Vec<&'a Entity>, PolicyError> {
    policy.validate()?;

    // Duplicate tags in source data count once for overlap purposes
    let anchor_genres: HashSet<&str> = anchor.genres.iter().map(String::as_str).collect();

    let mut ranked: Vec<(usize, &Entity)> = entities
        .iter()
        .filter(|candidate| candidate.id != anchor.id)
        .filter(|candidate| {
            candidate.rating >= policy.min_rating && candidate.popularity >= policy.min_popularity
        })
        .filter_map(|candidate| {
            let overlap = genre_overlap(&anchor_genres, candidate);
            if policy.require_genre_overlap && overlap == 0 {
                None
            } else {
                Some((overlap, candidate))
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| {
                b.1.rating
                    .partial_cmp(&a.1.rating)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| b.1.popularity.cmp(&a.1.popularity))
    });
    ranked.truncate(policy.top_k);

    debug!(
        anchor = %anchor.id,
        survivors = ranked.len(),
        top_k = policy.top_k,
        "built recommendation shortlist"
    );
    Ok(ranked.into_iter().map(|(_, entity)| entity).collect())
}

/// Count distinct genre tags shared between the anchor and a candidate.
fn genre_overlap(anchor_genres: &HashSet<&str>, candidate: &Entity) -> usize {
    candidate
        .genres
        .iter()
        .map(String::as_str)
        .collect::<HashSet<&str>>()
        .intersection(anchor_genres)
        .count()
}

/// Recommend one entity, drawing randomness from the supplied source.
///
/// The random source is injectable so callers (and the test suite) can
/// seed it; [`recommend`] wraps this with the process RNG for the
/// default end-user behavior.
pub fn recommend_with<'a, R: Rng + ?Sized>(
    entities: &'a [Entity],
    anchor: &Entity,
    policy: &Policy,
    rng: &mut R,
) -> Result<Option<&'a Entity>, PolicyError> {
    let shortlist = shortlist(entities, anchor, policy)?;
    if shortlist.is_empty() {
        return Ok(None);
    }
    let pick = match policy.selection {
        Selection::Best => shortlist[0],
        Selection::Random => shortlist[rng.random_range(0..shortlist.len())],
    };
    Ok(Some(pick))
}

/// Recommend one entity using the process random source.
pub fn recommend<'a>(
    entities: &'a [Entity],
    anchor: &Entity,
    policy: &Policy,
) -> Result<Option<&'a Entity>, PolicyError> {
    recommend_with(entities, anchor, policy, &mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::Map;

    fn entity(id: &str, title: &str, genres: &[&str], rating: f64, popularity: u64) -> Entity {
        Entity {
            id: id.to_string(),
            title: title.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            rating,
            popularity,
            extra: Map::new(),
        }
    }

    fn sample() -> Vec<Entity> {
        vec![
            entity("1", "Naruto", &["Action", "Adventure"], 8.1, 600_000),
            entity("2", "Naruto Shippuden", &["Action"], 8.2, 700_000),
            entity("3", "Bleach", &["Action", "Adventure"], 7.9, 650_000),
            entity("4", "Your Name", &["Romance"], 9.0, 900_000),
            entity("5", "Attack on Titan", &["Action", "Adventure"], 8.8, 1_200_000),
        ]
    }

    #[test]
    fn test_recommend_best_from_scenario() {
        // Anchor = Naruto; only Shippuden shares a genre and clears
        // both thresholds among top_k = 1
        let entities = vec![
            entity("1", "Naruto", &["Action", "Adventure"], 8.1, 600_000),
            entity("2", "Naruto Shippuden", &["Action"], 8.2, 700_000),
        ];
        let policy = Policy::default();
        let pick = recommend(&entities, &entities[0], &policy).unwrap().unwrap();
        assert_eq!(pick.id, "2");
    }

    #[test]
    fn test_anchor_is_excluded() {
        let entities = sample();
        let policy = Policy {
            top_k: 10,
            require_genre_overlap: false,
            ..Policy::default()
        };
        let list = shortlist(&entities, &entities[0], &policy).unwrap();
        assert!(list.iter().all(|e| e.id != "1"));
    }

    #[test]
    fn test_threshold_filters_hold() {
        let entities = sample();
        let policy = Policy {
            min_rating: 8.0,
            min_popularity: 650_000,
            require_genre_overlap: true,
            top_k: 10,
            selection: Selection::Best,
        };
        let list = shortlist(&entities, &entities[0], &policy).unwrap();
        assert!(!list.is_empty());
        for candidate in &list {
            assert!(candidate.rating >= 8.0);
            assert!(candidate.popularity >= 650_000);
            assert!(candidate.genres.iter().any(|g| g == "Action" || g == "Adventure"));
        }
    }

    #[test]
    fn test_ranking_tie_break_chain() {
        let entities = sample();
        let anchor = &entities[0];
        let policy = Policy {
            min_rating: 0.0,
            min_popularity: 0,
            require_genre_overlap: true,
            top_k: 10,
            selection: Selection::Best,
        };
        let list = shortlist(&entities, anchor, &policy).unwrap();

        // Overlap 2: Bleach (7.9), Attack on Titan (8.8); overlap 1: Shippuden
        let ids: Vec<&str> = list.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["5", "3", "2"]);
    }

    #[test]
    fn test_tie_break_is_monotonic() {
        let entities = sample();
        let anchor = &entities[0];
        let anchor_genres: HashSet<&str> = anchor.genres.iter().map(String::as_str).collect();
        let policy = Policy {
            min_rating: 0.0,
            min_popularity: 0,
            require_genre_overlap: false,
            top_k: 10,
            selection: Selection::Best,
        };
        let list = shortlist(&entities, anchor, &policy).unwrap();

        for pair in list.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let ov_a = genre_overlap(&anchor_genres, a);
            let ov_b = genre_overlap(&anchor_genres, b);
            assert!(ov_a >= ov_b);
            if ov_a == ov_b {
                assert!(a.rating >= b.rating);
                if a.rating == b.rating {
                    assert!(a.popularity >= b.popularity);
                }
            }
        }
    }

    #[test]
    fn test_duplicate_genre_tags_count_once() {
        let anchor = entity("a", "Anchor", &["Action"], 8.0, 1);
        let duped = entity("b", "Duped", &["Action", "Action"], 7.0, 1);
        let single = entity("c", "Single", &["Action"], 9.0, 1);
        let entities = vec![anchor.clone(), duped, single];
        let policy = Policy {
            min_rating: 0.0,
            min_popularity: 0,
            require_genre_overlap: true,
            top_k: 10,
            selection: Selection::Best,
        };
        let list = shortlist(&entities, &anchor, &policy).unwrap();
        // Equal overlap (1 each), so the higher-rated entity leads
        assert_eq!(list[0].id, "c");
    }

    #[test]
    fn test_empty_shortlist_in_both_modes() {
        let entities = sample();
        let anchor = &entities[0];
        let policy = Policy {
            min_rating: 9.9,
            ..Policy::default()
        };

        assert!(recommend(&entities, anchor, &policy).unwrap().is_none());

        let random = Policy {
            selection: Selection::Random,
            ..policy
        };
        let mut rng = StdRng::seed_from_u64(7);
        assert!(
            recommend_with(&entities, anchor, &random, &mut rng)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_anchor_without_genres_degrades_to_not_found() {
        let anchor = entity("a", "Anchor", &[], 8.0, 1_000_000);
        let other = entity("b", "Other", &["Action"], 9.0, 1_000_000);
        let entities = vec![anchor.clone(), other];
        let policy = Policy::default();
        assert!(recommend(&entities, &anchor, &policy).unwrap().is_none());
    }

    #[test]
    fn test_random_pick_stays_inside_shortlist() {
        let entities = sample();
        let anchor = &entities[0];
        let policy = Policy {
            min_rating: 0.0,
            min_popularity: 0,
            require_genre_overlap: false,
            top_k: 3,
            selection: Selection::Random,
        };
        let list = shortlist(&entities, anchor, &policy).unwrap();
        let ids: HashSet<&str> = list.iter().map(|e| e.id.as_str()).collect();

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let pick = recommend_with(&entities, anchor, &policy, &mut rng)
                .unwrap()
                .unwrap();
            assert!(ids.contains(pick.id.as_str()));
        }
    }

    #[test]
    fn test_invalid_policy_fails_before_filtering() {
        let entities = sample();
        let policy = Policy {
            top_k: 0,
            ..Policy::default()
        };
        let result = recommend(&entities, &entities[0], &policy);
        assert_eq!(result.unwrap_err(), PolicyError::ZeroShortlist);
    }
}
