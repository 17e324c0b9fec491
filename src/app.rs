// src/app.rs
use std::sync::Arc;

use crate::auth::SessionKeys;
use crate::config::{AppConfig, AuthConfig};
use crate::db::connection::Database;
use crate::errors::ServerError;
use crate::geocode::{Geocoder, NominatimGeocoder};
use crate::lead_store::LeadStore;
use crate::parcels::{ArcGisParcelSource, ParcelSource};
use crate::prospecting::{Region, REGIONS};

/// Everything a request handler needs, built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub leads: LeadStore,
    pub geocoder: Arc<dyn Geocoder>,
    pub parcels: Arc<dyn ParcelSource>,
    pub regions: &'static [Region],
    pub sessions: SessionKeys,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(
        db: Database,
        geocoder: Arc<dyn Geocoder>,
        parcels: Arc<dyn ParcelSource>,
        auth: AuthConfig,
    ) -> Result<Self, ServerError> {
        let sessions = SessionKeys::new(auth.require_secret()?, auth.secure_cookies);
        Ok(Self {
            leads: LeadStore::new(db, geocoder.clone()),
            geocoder,
            parcels,
            regions: REGIONS,
            sessions,
            auth,
        })
    }

    /// Production wiring: Nominatim and the ArcGIS county layers.
    pub fn from_config(config: &AppConfig, db: Database) -> Result<Self, ServerError> {
        let geocoder = NominatimGeocoder::new(&config.geocoder_url, &config.user_agent)
            .map_err(|e| ServerError::Config(format!("geocoder client: {e}")))?;
        let parcels = ArcGisParcelSource::new(&config.user_agent, config.parcel_timeout)
            .map_err(|e| ServerError::Config(format!("parcel client: {e}")))?;

        Self::new(db, Arc::new(geocoder), Arc::new(parcels), config.auth.clone())
    }
}
