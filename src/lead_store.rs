// src/lead_store.rs
use chrono::{NaiveDateTime, Timelike, Utc};
use std::sync::Arc;

use crate::db::connection::Database;
use crate::db::leads;
use crate::domain::lead::validate_name;
use crate::domain::{Lead, LeadPatch, LeadStatus, NewLead};
use crate::errors::ServerError;
use crate::geocode::{self, Geocoder};

/// Lead CRUD with best-effort geocoding on the side.
///
/// Geocoding never blocks a save: a failed or empty lookup just leaves the
/// coordinates null.
#[derive(Clone)]
pub struct LeadStore {
    db: Database,
    geocoder: Arc<dyn Geocoder>,
}

impl LeadStore {
    pub fn new(db: Database, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { db, geocoder }
    }

    pub fn list(
        &self,
        search: Option<&str>,
        status: Option<LeadStatus>,
    ) -> Result<Vec<Lead>, ServerError> {
        self.db.with_conn(|conn| leads::list_leads(conn, search, status))
    }

    pub fn get(&self, id: i64) -> Result<Lead, ServerError> {
        self.db
            .with_conn(|conn| leads::get_lead(conn, id))?
            .ok_or(ServerError::NotFound)
    }

    pub fn create(&self, new: NewLead) -> Result<Lead, ServerError> {
        new.validate()?;

        let coords = match new.explicit_coordinates() {
            Some(coords) => Some(coords),
            None => geocode::locate(
                self.geocoder.as_ref(),
                new.address.as_deref(),
                new.city.as_deref(),
            )
            .map(|c| c.pair()),
        };

        let id = self
            .db
            .with_conn(|conn| leads::insert_lead(conn, &new, coords, now()))?;
        tracing::info!("created lead {id} ({})", new.name.trim());
        self.get(id)
    }

    /// Merges `patch` over the stored row. Re-geocodes only when address or
    /// city changed value and the patch didn't bring its own coordinates.
    ///
    /// The lookup runs outside the connection lock. The merge and write then
    /// happen against a fresh read inside one transaction, so a concurrent
    /// update to other fields is never overwritten.
    pub fn update(&self, id: i64, patch: LeadPatch) -> Result<Lead, ServerError> {
        let snapshot = self.get(id)?;
        let (planned, location_changed) = patch.merge_into(&snapshot);
        validate_name(&planned.name)?;

        let located = if patch.explicit_coordinates().is_none() && location_changed {
            let coords = geocode::locate(
                self.geocoder.as_ref(),
                planned.address.as_deref(),
                planned.city.as_deref(),
            );
            Some((planned.address.clone(), planned.city.clone(), coords))
        } else {
            None
        };

        let updated = self.db.with_conn(|conn| {
            let tx = conn
                .transaction()
                .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

            let current = leads::get_lead(&tx, id)?.ok_or(ServerError::NotFound)?;
            let (mut merged, location_changed) = patch.merge_into(&current);
            validate_name(&merged.name)?;

            if let Some((lat, lng)) = patch.explicit_coordinates() {
                merged.lat = Some(lat);
                merged.lng = Some(lng);
            } else if location_changed {
                // a location we did not look up is left for geocode-missing
                let coords = match &located {
                    Some((address, city, coords))
                        if *address == merged.address && *city == merged.city =>
                    {
                        *coords
                    }
                    _ => None,
                };
                merged.lat = coords.map(|c| c.lat);
                merged.lng = coords.map(|c| c.lng);
            }

            merged.updated_at = now().max(current.updated_at);
            leads::update_lead(&tx, &merged)?;
            let stored = leads::get_lead(&tx, id)?.ok_or(ServerError::NotFound)?;

            tx.commit()
                .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;
            Ok(stored)
        })?;

        tracing::info!("updated lead {id}");
        Ok(updated)
    }

    /// Lead count per status for the pipeline summary.
    pub fn status_counts(&self) -> Result<Vec<(LeadStatus, i64)>, ServerError> {
        self.db.with_conn(|conn| leads::count_by_status(conn))
    }

    pub fn delete(&self, id: i64) -> Result<(), ServerError> {
        let removed = self.db.with_conn(|conn| leads::delete_lead(conn, id))?;
        if !removed {
            return Err(ServerError::NotFound);
        }
        tracing::info!("deleted lead {id}");
        Ok(())
    }

    pub fn count(&self) -> Result<i64, ServerError> {
        self.db.with_conn(|conn| leads::count_leads(conn))
    }

    /// Inserts all of `batch` in one transaction, without geocoding.
    pub fn seed(&self, batch: &[NewLead]) -> Result<usize, ServerError> {
        self.db
            .with_conn(|conn| leads::seed_leads(conn, batch, now()))
    }
}

fn now() -> NaiveDateTime {
    let ts = Utc::now().naive_utc();
    // stored at second precision
    ts.with_nanosecond(0).unwrap_or(ts)
}
