pub mod aggregator;
pub mod regions;

pub use aggregator::{ProspectAggregator, ProspectExport, ProspectPage, RegionState, RegionStatus, PAGE_SIZE};
pub use regions::{select, Region, REGIONS};
