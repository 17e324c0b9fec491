mod arcgis;
mod models;
mod parcel_error;

pub use arcgis::{ArcGisParcelSource, RECORDS_PER_REGION};
pub use parcel_error::ParcelError;

use crate::domain::Prospect;

/// One parcel-data service per region.
///
/// Implementations report failures as `Err`; the aggregator turns those into
/// an empty contribution plus a failed status for the region.
pub trait ParcelSource: Send + Sync {
    /// Matching records for `region`, largest first.
    fn fetch(&self, region: &str, endpoint: &str) -> Result<Vec<Prospect>, ParcelError>;
}
