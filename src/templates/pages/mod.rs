pub mod lead_form;
pub mod leads;
pub mod login;
pub mod map;
pub mod prospecting;

pub use lead_form::lead_form_page;
pub use leads::{leads_page, LeadsVm};
pub use login::login_page;
pub use map::map_page;
pub use prospecting::{prospecting_page, ProspectingVm};
