// src/domain/prospect.rs

use serde::Serialize;

pub const MIN_SQFT: i64 = 4000;
pub const MAX_SQFT: i64 = 15000;
/// Buildings must be at least this many years old.
pub const MIN_AGE_YEARS: i32 = 20;
/// Construction years at or below this are treated as bad data.
pub const BUILT_YEAR_FLOOR: i32 = 1800;

/// A candidate property from a live parcel query. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    /// Source parcel identifier.
    pub id: String,
    pub address: String,
    pub city: String,
    /// Region the record came from.
    pub county: String,
    pub sqft: i64,
    pub built_year: i32,
    pub age: i32,
    pub prop_class: String,
}

/// The targeting rules, anchored to a calendar year so tests can pin it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProspectRules {
    pub current_year: i32,
    pub min_sqft: i64,
    pub max_sqft: i64,
}

impl ProspectRules {
    pub fn for_year(current_year: i32) -> Self {
        Self {
            current_year,
            min_sqft: MIN_SQFT,
            max_sqft: MAX_SQFT,
        }
    }

    pub fn current() -> Self {
        use chrono::Datelike;
        Self::for_year(chrono::Local::now().year())
    }

    /// Newest construction year that still qualifies.
    pub fn cutoff_year(&self) -> i32 {
        self.current_year - MIN_AGE_YEARS
    }

    /// Payload-side check; the upper sqft bound lives only in the query.
    pub fn accepts(&self, sqft: i64, built_year: i32) -> bool {
        sqft >= self.min_sqft && built_year > BUILT_YEAR_FLOOR && built_year <= self.cutoff_year()
    }

    pub fn age_of(&self, built_year: i32) -> i32 {
        self.current_year - built_year
    }
}
