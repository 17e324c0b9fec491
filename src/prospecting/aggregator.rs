// aggregator.rs
use serde::Serialize;
use std::thread;

use crate::domain::Prospect;
use crate::parcels::{ParcelError, ParcelSource};
use crate::prospecting::regions::Region;

pub const PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionState {
    Ok,
    Failed,
}

/// Per-region result, so "no matches" and "call failed" stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionStatus {
    pub name: String,
    pub status: RegionState,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectPage {
    pub prospects: Vec<Prospect>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub regions: Vec<RegionStatus>,
}

#[derive(Debug, Serialize)]
pub struct ProspectExport {
    pub prospects: Vec<Prospect>,
    pub total: usize,
    pub regions: Vec<RegionStatus>,
}

pub struct ProspectAggregator<'a> {
    source: &'a dyn ParcelSource,
}

impl<'a> ProspectAggregator<'a> {
    pub fn new(source: &'a dyn ParcelSource) -> Self {
        Self { source }
    }

    /// Queries every region in parallel, waits for all of them, and returns
    /// the merged records sorted by sqft descending.
    pub fn gather(&self, regions: &[&Region]) -> (Vec<Prospect>, Vec<RegionStatus>) {
        let results: Vec<Result<Vec<Prospect>, ParcelError>> = thread::scope(|s| {
            let handles: Vec<_> = regions
                .iter()
                .map(|region| s.spawn(move || self.source.fetch(region.name, region.endpoint)))
                .collect();

            handles
                .into_iter()
                .map(|h| {
                    h.join().unwrap_or_else(|_| {
                        Err(ParcelError::Network("region worker panicked".into()))
                    })
                })
                .collect()
        });

        let mut merged = Vec::new();
        let mut statuses = Vec::with_capacity(regions.len());

        for (region, result) in regions.iter().zip(results) {
            match result {
                Ok(prospects) => {
                    tracing::debug!("{}: {} prospects", region.name, prospects.len());
                    statuses.push(RegionStatus {
                        name: region.name.to_string(),
                        status: RegionState::Ok,
                        count: prospects.len(),
                    });
                    merged.extend(prospects);
                }
                Err(e) => {
                    tracing::warn!("parcel query for {} failed: {e}", region.name);
                    statuses.push(RegionStatus {
                        name: region.name.to_string(),
                        status: RegionState::Failed,
                        count: 0,
                    });
                }
            }
        }

        // stable: equal sqft keeps region-table order
        merged.sort_by(|a, b| b.sqft.cmp(&a.sqft));
        (merged, statuses)
    }

    pub fn page(&self, regions: &[&Region], page: usize) -> ProspectPage {
        let (all, statuses) = self.gather(regions);
        paginate(all, page, statuses)
    }

    pub fn export(&self, regions: &[&Region]) -> ProspectExport {
        let (prospects, statuses) = self.gather(regions);
        ProspectExport {
            total: prospects.len(),
            prospects,
            regions: statuses,
        }
    }
}

/// Slices one page out of an already-sorted list. Past the end is an empty page.
pub fn paginate(all: Vec<Prospect>, page: usize, regions: Vec<RegionStatus>) -> ProspectPage {
    let total = all.len();
    let start = page.saturating_mul(PAGE_SIZE).min(total);
    let prospects: Vec<Prospect> = all.into_iter().skip(start).take(PAGE_SIZE).collect();

    ProspectPage {
        prospects,
        total,
        page,
        page_size: PAGE_SIZE,
        total_pages: total.div_ceil(PAGE_SIZE),
        regions,
    }
}
