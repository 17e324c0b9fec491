use crate::errors::ServerError;
use crate::templates;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

pub type ResultResp = Result<Response, ServerError>;

/// JSON routes answer `{"error": "..."}` with the matching status.
pub fn json_error_response(err: &ServerError) -> Response {
    log_error(err);
    let body = json!({ "error": err.public_message() }).to_string();
    build(err.status(), "application/json", body)
}

/// Page routes get a rendered error page.
pub fn html_error_response(err: &ServerError) -> Response {
    log_error(err);
    let page = templates::error_page(err.status(), &err.public_message());
    build(err.status(), "text/html; charset=utf-8", page.into_string())
}

fn log_error(err: &ServerError) {
    if err.status() >= 500 {
        tracing::error!("{err}");
    } else {
        tracing::debug!("{err}");
    }
}

fn build(status: u16, content_type: &str, body: String) -> Response {
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", content_type)
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error".to_string())))
}
