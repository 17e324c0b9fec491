// batch.rs
use std::time::{Duration, Instant};

use crate::db::connection::Database;
use crate::db::leads::{leads_missing_coordinates, set_coordinates};
use crate::errors::ServerError;
use crate::geocode::{Geocoder, Lookup};

pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Spaces task starts at least `interval` apart. The first task runs immediately.
pub struct FixedDelayPacer<C: Clock> {
    clock: C,
    interval: Duration,
    last_start: Option<Instant>,
}

impl<C: Clock> FixedDelayPacer<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        Self {
            clock,
            interval,
            last_start: None,
        }
    }

    /// Blocks until the next slot, then runs `task`.
    pub fn run<T>(&mut self, task: impl FnOnce() -> T) -> T {
        if let Some(last) = self.last_start {
            let elapsed = self.clock.now().saturating_duration_since(last);
            if elapsed < self.interval {
                self.clock.sleep(self.interval - elapsed);
            }
        }
        self.last_start = Some(self.clock.now());
        task()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub no_match: usize,
    pub failed: usize,
}

/// Geocodes every lead that has an address but no coordinates, one request per slot.
pub fn geocode_missing<C: Clock>(
    db: &Database,
    geocoder: &dyn Geocoder,
    pacer: &mut FixedDelayPacer<C>,
) -> Result<BatchReport, ServerError> {
    let todo = db.with_conn(|conn| leads_missing_coordinates(conn))?;
    tracing::info!("found {} leads to geocode", todo.len());

    let mut report = BatchReport::default();
    for lead in todo {
        let outcome = pacer.run(|| geocoder.forward(lead.address.as_deref(), lead.city.as_deref()));

        match outcome {
            Lookup::Found(coords) => {
                db.with_conn(|conn| set_coordinates(conn, lead.id, Some(coords.pair())))?;
                tracing::info!("✓ {} → {:.5}, {:.5}", lead.name, coords.lat, coords.lng);
                report.succeeded += 1;
            }
            Lookup::NoMatch | Lookup::NoQuery => {
                tracing::info!("✗ {}: could not geocode {:?}", lead.name, lead.location_line());
                report.no_match += 1;
            }
            Lookup::Failed(e) => {
                tracing::warn!("✗ {}: geocoder error: {e}", lead.name);
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        "done: {} geocoded, {} unmatched, {} failed",
        report.succeeded,
        report.no_match,
        report.failed
    );
    Ok(report)
}
