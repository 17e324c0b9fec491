pub mod sessions;
pub mod token;

pub use sessions::{check_credentials, SessionKeys, SESSION_COOKIE_NAME};
