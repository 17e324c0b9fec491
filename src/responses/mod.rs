pub mod errors;
pub mod html;
pub mod json;
pub mod xlsx;

pub use errors::{html_error_response, json_error_response, ResultResp};
pub use html::{html_response, html_with_status, redirect, redirect_with_cookie};
pub use json::{json_response, json_with_status};
pub use xlsx::xlsx_response;
