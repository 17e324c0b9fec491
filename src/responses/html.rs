use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use maud::Markup;

pub fn html_response(markup: Markup) -> ResultResp {
    html_with_status(200, markup)
}

pub fn html_with_status(status: u16, markup: Markup) -> ResultResp {
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}

/// 302 to `location`.
pub fn redirect(location: &str) -> ResultResp {
    redirect_with_cookie(location, None)
}

pub fn redirect_with_cookie(location: &str, set_cookie: Option<&str>) -> ResultResp {
    let mut builder = ResponseBuilder::new().status(302).header("Location", location);
    if let Some(cookie) = set_cookie {
        builder = builder.header("Set-Cookie", cookie);
    }
    builder
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}
