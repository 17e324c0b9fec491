pub mod lead;
pub mod prospect;

pub use lead::{Lead, LeadPatch, LeadStatus, NewLead};
pub use prospect::{Prospect, ProspectRules};
