//! Demographic filter predicates for user-based recommendations
//!
//! Each predicate documents what it discards. Filters are applied as a
//! conjunction: a user must pass every provided predicate to be selected.

use crate::catalog::UserRecord;
use serde::Deserialize;

/// Ages outside this range are treated as data-entry noise and discarded.
pub const MIN_AGE: f64 = 5.0;
pub const MAX_AGE: f64 = 100.0;

/// Optional demographic constraints on the user cohort.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemographicFilter {
    /// Case-insensitive exact match against the user's derived country.
    pub country: Option<String>,
    /// Inclusive [min, max] age bounds.
    pub age_range: Option<(f64, f64)>,
}

/// Country derived from a free-text location: the trailing comma-separated
/// token, trimmed. `"nyc, new york, usa"` yields `"usa"`.
pub fn country_of(location: &str) -> &str {
    location.rsplit(',').next().unwrap_or(location).trim()
}

/// A user's age if present and inside [MIN_AGE, MAX_AGE]; discards records
/// with missing or implausible ages.
pub fn plausible_age(age: Option<f64>) -> Option<f64> {
    age.filter(|a| (MIN_AGE..=MAX_AGE).contains(a))
}

impl DemographicFilter {
    /// Whether a user record passes every provided predicate.
    pub fn matches(&self, user: &UserRecord) -> bool {
        let Some(age) = plausible_age(user.age) else {
            return false;
        };
        if let Some(country) = &self.country {
            if country_of(&user.location).to_lowercase() != country.to_lowercase() {
                return false;
            }
        }
        if let Some((min_age, max_age)) = self.age_range {
            if age < min_age || age > max_age {
                return false;
            }
        }
        true
    }
}
