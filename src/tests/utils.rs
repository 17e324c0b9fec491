use crate::app::AppState;
use crate::auth::SESSION_COOKIE_NAME;
use crate::config::AuthConfig;
use crate::db::connection::{init_db, Database};
use crate::domain::Prospect;
use crate::geocode::{Coordinates, Geocoder, Lookup, ReverseAddress};
use crate::parcels::{ParcelError, ParcelSource};
use crate::prospecting::Region;
use crate::router::serve;
use astra::{Body, Response};
use chrono::Utc;
use http::{Method, Request};
use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_USERNAME: &str = "owner";
pub const TEST_PASSWORD: &str = "correct-horse";

pub const TEST_REGIONS: &[Region] = &[
    Region {
        name: "A",
        endpoint: "http://parcels.test/a",
    },
    Region {
        name: "B",
        endpoint: "http://parcels.test/b",
    },
    Region {
        name: "C",
        endpoint: "http://parcels.test/c",
    },
];

/// Fresh in-memory DB built from the production schema.
pub fn init_test_db() -> Database {
    let db = Database::open_in_memory().expect("open in-memory db");
    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

/// Geocoder double that answers every forward lookup with the same result
/// and counts how often it was asked.
pub struct CountingGeocoder {
    answer: Option<Coordinates>,
    calls: AtomicUsize,
    queries: Mutex<Vec<(Option<String>, Option<String>)>>,
}

impl CountingGeocoder {
    pub fn answering(lat: f64, lng: f64) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(Coordinates { lat, lng }),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn never_matching() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<(Option<String>, Option<String>)> {
        self.queries.lock().unwrap().last().cloned()
    }
}

impl Geocoder for CountingGeocoder {
    fn forward(&self, address: Option<&str>, city: Option<&str>) -> Lookup<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap()
            .push((address.map(String::from), city.map(String::from)));
        match self.answer {
            Some(coords) => Lookup::Found(coords),
            None => Lookup::NoMatch,
        }
    }

    fn reverse(&self, _lat: f64, _lng: f64) -> Lookup<ReverseAddress> {
        Lookup::Found(ReverseAddress {
            address: Some("10 Test St".into()),
            city: Some("Testville".into()),
        })
    }
}

/// Parcel source with canned per-region results. Regions not listed return nothing.
#[derive(Default)]
pub struct FakeParcels {
    results: HashMap<&'static str, Result<Vec<Prospect>, ()>>,
    pub calls: AtomicUsize,
}

impl FakeParcels {
    pub fn with(mut self, region: &'static str, prospects: Vec<Prospect>) -> Self {
        self.results.insert(region, Ok(prospects));
        self
    }

    pub fn failing(mut self, region: &'static str) -> Self {
        self.results.insert(region, Err(()));
        self
    }
}

impl ParcelSource for FakeParcels {
    fn fetch(&self, region: &str, _endpoint: &str) -> Result<Vec<Prospect>, ParcelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.results.get(region) {
            Some(Ok(prospects)) => Ok(prospects.clone()),
            Some(Err(())) => Err(ParcelError::Status(503)),
            None => Ok(Vec::new()),
        }
    }
}

pub fn prospect(county: &str, n: usize, sqft: i64) -> Prospect {
    Prospect {
        id: format!("{county}-{n}"),
        address: format!("{n} Main St"),
        city: "Testville".into(),
        county: county.into(),
        sqft,
        built_year: 1985,
        age: 41,
        prop_class: "Residential".into(),
    }
}

pub fn test_auth() -> AuthConfig {
    AuthConfig {
        username: Some(TEST_USERNAME.into()),
        password: Some(TEST_PASSWORD.into()),
        session_secret: Some("test-session-secret".into()),
        secure_cookies: false,
    }
}

pub fn test_app_with(geocoder: Arc<dyn Geocoder>, parcels: Arc<dyn ParcelSource>) -> AppState {
    let mut app = AppState::new(init_test_db(), geocoder, parcels, test_auth())
        .expect("build test app");
    app.regions = TEST_REGIONS;
    app
}

pub fn test_app() -> AppState {
    test_app_with(
        CountingGeocoder::answering(40.76, -111.89),
        Arc::new(FakeParcels::default()),
    )
}

pub fn session_cookie(app: &AppState) -> String {
    let token = app.sessions.issue(Utc::now().timestamp());
    format!("{SESSION_COOKIE_NAME}={token}")
}

/// Signed-in request through the full router, errors rendered as the server would.
pub fn send(app: &AppState, method: Method, uri: &str, body: Body, content_type: &str) -> Response {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Cookie", session_cookie(app))
        .header("Content-Type", content_type)
        .body(body)
        .unwrap();
    serve(req, app)
}

pub fn get(app: &AppState, uri: &str) -> Response {
    send(app, Method::GET, uri, Body::empty(), "text/plain")
}

pub fn send_json(app: &AppState, method: Method, uri: &str, value: serde_json::Value) -> Response {
    send(
        app,
        method,
        uri,
        Body::from(value.to_string()),
        "application/json",
    )
}

pub fn post_form(app: &AppState, uri: &str, form: &str) -> Response {
    send(
        app,
        Method::POST,
        uri,
        Body::from(form.to_string()),
        "application/x-www-form-urlencoded",
    )
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(resp)).expect("response is JSON")
}

pub fn header(resp: &Response, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
