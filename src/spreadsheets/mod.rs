pub mod prospects_xlsx;

pub use prospects_xlsx::{export_prospects_xlsx, prospects_workbook};
