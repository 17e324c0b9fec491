//! Address ⇄ coordinate lookups.
//!
//! Geocoding is enrichment only: every lookup resolves to a [`Lookup`] and the
//! helpers at the bottom collapse that to `Option`, logging failures on the way.
mod batch;
mod geocode_error;
mod nominatim;

use serde::Serialize;

pub use batch::{geocode_missing, BatchReport, Clock, FixedDelayPacer, SystemClock};
pub use geocode_error::GeocodeError;
pub use nominatim::NominatimGeocoder;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn pair(self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// Best-effort reverse lookup result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReverseAddress {
    pub address: Option<String>,
    pub city: Option<String>,
}

/// Outcome of a single lookup. Keeps "nothing matched" apart from "the call failed".
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    NoMatch,
    /// Nothing to look up; no request was made.
    NoQuery,
    Failed(GeocodeError),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            _ => None,
        }
    }
}

pub trait Geocoder: Send + Sync {
    fn forward(&self, address: Option<&str>, city: Option<&str>) -> Lookup<Coordinates>;
    fn reverse(&self, lat: f64, lng: f64) -> Lookup<ReverseAddress>;
}

/// Forward lookup that never fails; failures are logged and read as "no coordinates".
pub fn locate(geocoder: &dyn Geocoder, address: Option<&str>, city: Option<&str>) -> Option<Coordinates> {
    match geocoder.forward(address, city) {
        Lookup::Found(coords) => Some(coords),
        Lookup::NoMatch => {
            tracing::debug!("no geocode match for {:?}, {:?}", address, city);
            None
        }
        Lookup::NoQuery => None,
        Lookup::Failed(e) => {
            tracing::warn!("geocode failed for {:?}, {:?}: {e}", address, city);
            None
        }
    }
}

/// Reverse lookup that never fails.
pub fn describe(geocoder: &dyn Geocoder, lat: f64, lng: f64) -> Option<ReverseAddress> {
    match geocoder.reverse(lat, lng) {
        Lookup::Failed(e) => {
            tracing::warn!("reverse geocode failed for {lat},{lng}: {e}");
            None
        }
        other => other.found(),
    }
}
