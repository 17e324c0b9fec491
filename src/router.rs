use std::io::Read;

use astra::{Request, Response};
use chrono::{Local, Utc};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::form_urlencoded;

use crate::app::AppState;
use crate::auth::check_credentials;
use crate::domain::{LeadPatch, LeadStatus, NewLead};
use crate::errors::ServerError;
use crate::geocode;
use crate::prospecting::{self, ProspectAggregator};
use crate::responses::{
    html_error_response, html_response, html_with_status, json_error_response, json_response,
    json_with_status, redirect, redirect_with_cookie, ResultResp,
};
use crate::spreadsheets::export_prospects_xlsx;
use crate::templates::pages::{self, LeadsVm, ProspectingVm};

const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Entry point for the server loop. API paths answer errors as JSON, pages as HTML.
pub fn serve(req: Request, app: &AppState) -> Response {
    let is_api = req.uri().path().starts_with("/api/");
    match handle(req, app) {
        Ok(resp) => resp,
        Err(err) if is_api => json_error_response(&err),
        Err(err) => html_error_response(&err),
    }
}

pub fn handle(mut req: Request, app: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = Params::parse(req.uri().query().unwrap_or(""));
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let is_public = matches!(segments.as_slice(), ["login"]);
    if !is_public && !app.sessions.is_authenticated(&req, Utc::now().timestamp()) {
        return match segments.first() {
            Some(&"api") => Err(ServerError::Unauthorized("Unauthorized".into())),
            _ => redirect("/login"),
        };
    }

    match (method.as_str(), segments.as_slice()) {
        // JSON API
        ("GET", ["api", "leads"]) => {
            let leads = app.leads.list(query.get("search"), status_filter(&query)?)?;
            json_response(&leads)
        }
        ("POST", ["api", "leads"]) => {
            let new: NewLead = read_json(&mut req)?;
            json_with_status(201, &app.leads.create(new)?)
        }
        ("GET", ["api", "leads", id]) => json_response(&app.leads.get(parse_id(id)?)?),
        ("PUT", ["api", "leads", id]) => {
            let patch: LeadPatch = read_json(&mut req)?;
            json_response(&app.leads.update(parse_id(id)?, patch)?)
        }
        ("DELETE", ["api", "leads", id]) => {
            app.leads.delete(parse_id(id)?)?;
            json_response(&json!({ "success": true }))
        }
        ("GET", ["api", "prospecting"]) => {
            let selected = prospecting::select(app.regions, query.joined("counties").as_deref());
            let aggregator = ProspectAggregator::new(app.parcels.as_ref());
            if query.flag("export") {
                json_response(&aggregator.export(&selected))
            } else {
                json_response(&aggregator.page(&selected, query.page()))
            }
        }
        ("GET", ["api", "geocode", "reverse"]) => {
            let lat = query.coordinate("lat")?;
            let lng = query.coordinate("lng")?;
            json_response(&geocode::describe(app.geocoder.as_ref(), lat, lng))
        }

        // Pages
        ("GET", []) => {
            let status = status_filter(&query)?;
            let search = query.get("search").unwrap_or("");
            let leads = app.leads.list(Some(search), status)?;
            let counts = app.leads.status_counts()?;
            html_response(pages::leads_page(&LeadsVm {
                leads: &leads,
                search,
                status,
                counts: &counts,
            }))
        }
        ("GET", ["leads", "new"]) => html_response(pages::lead_form_page(None, None)),
        ("POST", ["leads"]) => {
            let form = read_form(&mut req)?;
            match app.leads.create(new_lead_from_form(&form)?) {
                Ok(lead) => redirect(&format!("/leads/{}", lead.id)),
                Err(ServerError::BadRequest(msg)) => {
                    html_with_status(400, pages::lead_form_page(None, Some(&msg)))
                }
                Err(e) => Err(e),
            }
        }
        ("GET", ["leads", id]) => {
            let lead = app.leads.get(parse_id(id)?)?;
            html_response(pages::lead_form_page(Some(&lead), None))
        }
        ("POST", ["leads", id]) => {
            let id = parse_id(id)?;
            let form = read_form(&mut req)?;
            match app.leads.update(id, patch_from_form(&form)?) {
                Ok(_) => redirect("/"),
                Err(ServerError::BadRequest(msg)) => {
                    let lead = app.leads.get(id)?;
                    html_with_status(400, pages::lead_form_page(Some(&lead), Some(&msg)))
                }
                Err(e) => Err(e),
            }
        }
        ("POST", ["leads", id, "delete"]) => {
            app.leads.delete(parse_id(id)?)?;
            redirect("/")
        }
        ("GET", ["map"]) => {
            let leads = app.leads.list(None, None)?;
            html_response(pages::map_page(&leads))
        }
        ("GET", ["prospecting"]) => {
            let selected = prospecting::select(app.regions, query.joined("counties").as_deref());
            let page = ProspectAggregator::new(app.parcels.as_ref()).page(&selected, query.page());
            html_response(pages::prospecting_page(&ProspectingVm {
                regions: app.regions,
                selected: &selected,
                page: &page,
            }))
        }
        ("GET", ["prospecting", "export.xlsx"]) => {
            let selected = prospecting::select(app.regions, query.joined("counties").as_deref());
            let export = ProspectAggregator::new(app.parcels.as_ref()).export(&selected);
            let date = Local::now().format("%Y-%m-%d").to_string();
            export_prospects_xlsx(&export.prospects, &date)
        }

        // Session
        ("GET", ["login"]) => html_response(pages::login_page(query.flag("error"))),
        ("POST", ["login"]) => {
            let form = read_form(&mut req)?;
            let username = form.get("username").unwrap_or("");
            let password = form.get("password").unwrap_or("");

            if check_credentials(&app.auth, username, password) {
                tracing::info!("login for {username}");
                let token = app.sessions.issue(Utc::now().timestamp());
                redirect_with_cookie("/", Some(&app.sessions.set_cookie(&token)))
            } else {
                tracing::warn!("failed login for {username:?}");
                redirect("/login?error=1")
            }
        }
        ("POST", ["logout"]) => redirect_with_cookie("/login", Some(&app.sessions.clear_cookie())),

        _ => Err(ServerError::NotFound),
    }
}

/// Decoded `key=value` pairs from a query string or form body. Repeated keys are kept.
struct Params(Vec<(String, String)>);

impl Params {
    fn parse(raw: &str) -> Self {
        Params(form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Non-blank trimmed value, for optional form fields.
    fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Every value for `key` joined with commas; None when the key is absent.
    fn joined(&self, key: &str) -> Option<String> {
        let values: Vec<&str> = self
            .0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect();
        (!values.is_empty()).then(|| values.join(","))
    }

    fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some("1" | "true"))
    }

    /// Zero-based page index; anything unparsable (negative included) reads as 0.
    fn page(&self) -> usize {
        self.get("page")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(0)
    }

    fn coordinate(&self, key: &str) -> Result<f64, ServerError> {
        self.get(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| ServerError::BadRequest(format!("{key} must be a number")))
    }
}

fn status_filter(params: &Params) -> Result<Option<LeadStatus>, ServerError> {
    params
        .get("status")
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<LeadStatus>())
        .transpose()
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid id: {raw}")))
}

fn read_body(req: &mut Request) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("could not read body: {e}")))?;
    Ok(buf)
}

fn read_json<T: DeserializeOwned>(req: &mut Request) -> Result<T, ServerError> {
    let body = read_body(req)?;
    serde_json::from_slice(&body).map_err(|e| ServerError::BadRequest(format!("invalid JSON: {e}")))
}

fn read_form(req: &mut Request) -> Result<Params, ServerError> {
    let body = read_body(req)?;
    Ok(Params(form_urlencoded::parse(&body).into_owned().collect()))
}

fn form_status(form: &Params) -> Result<Option<LeadStatus>, ServerError> {
    form.text("status").map(|s| s.parse::<LeadStatus>()).transpose()
}

fn new_lead_from_form(form: &Params) -> Result<NewLead, ServerError> {
    Ok(NewLead {
        name: form.get("name").unwrap_or("").trim().to_string(),
        phone: form.text("phone"),
        email: form.text("email"),
        address: form.text("address"),
        city: form.text("city"),
        status: form_status(form)?,
        source: form.text("source"),
        notes: form.text("notes"),
        lat: None,
        lng: None,
    })
}

/// The edit form posts every field, so a blank input clears the stored value.
fn patch_from_form(form: &Params) -> Result<LeadPatch, ServerError> {
    Ok(LeadPatch {
        name: Some(form.get("name").unwrap_or("").trim().to_string()),
        phone: Some(form.text("phone")),
        email: Some(form.text("email")),
        address: Some(form.text("address")),
        city: Some(form.text("city")),
        status: form_status(form)?,
        source: Some(form.text("source")),
        notes: Some(form.text("notes")),
        lat: None,
        lng: None,
    })
}
