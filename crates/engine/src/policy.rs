//! Recommendation policy: thresholds and selection mode.
//!
//! The policy bundles every knob the presentation layer exposes for
//! recommendations. It is validated up front; an invalid policy is a
//! configuration error and fails before any scan of the collection.

use thiserror::Error;

/// How the final pick is drawn from the ranked shortlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Deterministic: always the top-ranked candidate
    Best,
    /// Uniformly random among the shortlist; repeated identical queries
    /// may differ, which is the intended end-user behavior
    Random,
}

/// Configuration governing recommendation filtering and selection.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Inclusive lower bound on a candidate's rating
    pub min_rating: f64,
    /// Inclusive lower bound on a candidate's popularity
    pub min_popularity: u64,
    /// Require at least one genre tag shared with the anchor
    pub require_genre_overlap: bool,
    /// Size of the shortlist the final pick is drawn from
    pub top_k: usize,
    pub selection: Selection,
}

impl Policy {
    /// Check the policy before any collection scan.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.top_k < 1 {
            return Err(PolicyError::ZeroShortlist);
        }
        if !self.min_rating.is_finite() || self.min_rating < 0.0 {
            return Err(PolicyError::InvalidMinRating {
                value: self.min_rating,
            });
        }
        Ok(())
    }
}

impl Default for Policy {
    /// Thresholds of the original dashboard's anime recommendation:
    /// rating above 8.0, at least 500k members, shared genre required,
    /// deterministic top pick.
    fn default() -> Self {
        Self {
            min_rating: 8.0,
            min_popularity: 500_000,
            require_genre_overlap: true,
            top_k: 1,
            selection: Selection::Best,
        }
    }
}

/// A policy that cannot be executed. Configuration error, not a data
/// condition; surfaced immediately and never retried.
#[derive(Error, Debug, PartialEq)]
pub enum PolicyError {
    #[error("Shortlist size (top_k) must be at least 1")]
    ZeroShortlist,

    #[error("Minimum rating must be a non-negative finite number, got {value}")]
    InvalidMinRating { value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(Policy::default().validate().is_ok());
    }

    #[test]
    fn test_zero_top_k_is_invalid() {
        let policy = Policy {
            top_k: 0,
            ..Policy::default()
        };
        assert_eq!(policy.validate(), Err(PolicyError::ZeroShortlist));
    }

    #[test]
    fn test_negative_min_rating_is_invalid() {
        let policy = Policy {
            min_rating: -1.0,
            ..Policy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::InvalidMinRating { .. })
        ));
    }

    #[test]
    fn test_nan_min_rating_is_invalid() {
        let policy = Policy {
            min_rating: f64::NAN,
            ..Policy::default()
        };
        assert!(policy.validate().is_err());
    }
}
