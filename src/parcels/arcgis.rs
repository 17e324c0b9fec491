// arcgis.rs
use reqwest::blocking::Client;
use std::time::Duration;

use crate::domain::prospect::{Prospect, ProspectRules, BUILT_YEAR_FLOOR};
use crate::parcels::models::{number_attr, text_attr, QueryResponse};
use crate::parcels::{ParcelError, ParcelSource};

/// Upper bound on records requested from each region.
pub const RECORDS_PER_REGION: usize = 2000;

const OUT_FIELDS: &str = "PARCEL_ID,PARCEL_ADD,PARCEL_CITY,BLDG_SQFT,BUILT_YR,PROP_CLASS";

/// Queries county parcel layers published as ArcGIS FeatureServer endpoints.
pub struct ArcGisParcelSource {
    client: Client,
    timeout: Duration,
}

impl ArcGisParcelSource {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ParcelError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ParcelError::Network(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    fn map_send_error(&self, e: reqwest::Error) -> ParcelError {
        if e.is_timeout() {
            ParcelError::Timeout(self.timeout)
        } else if e.is_decode() {
            ParcelError::JsonParse(e.to_string())
        } else {
            ParcelError::Network(e.to_string())
        }
    }
}

impl ParcelSource for ArcGisParcelSource {
    fn fetch(&self, region: &str, endpoint: &str) -> Result<Vec<Prospect>, ParcelError> {
        let rules = ProspectRules::current();
        let url = format!("{}/query", endpoint.trim_end_matches('/'));

        let resp = self
            .client
            .get(&url)
            .query(&query_params(&rules))
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ParcelError::Status(status.as_u16()));
        }

        let body = resp.text().map_err(|e| self.map_send_error(e))?;
        let parsed: QueryResponse =
            serde_json::from_str(&body).map_err(|e| ParcelError::JsonParse(e.to_string()))?;

        normalize(region, parsed, &rules)
    }
}

/// The filter sent upstream. Same rules are re-checked on the payload.
pub fn where_clause(rules: &ProspectRules) -> String {
    format!(
        "BUILT_YR <= {} AND BUILT_YR > {} AND BLDG_SQFT >= {} AND BLDG_SQFT <= {} \
         AND PROP_CLASS = 'Residential' AND PRIMARY_RES = 'Y'",
        rules.cutoff_year(),
        BUILT_YEAR_FLOOR,
        rules.min_sqft,
        rules.max_sqft,
    )
}

pub fn query_params(rules: &ProspectRules) -> Vec<(&'static str, String)> {
    vec![
        ("where", where_clause(rules)),
        ("outFields", OUT_FIELDS.to_string()),
        ("resultRecordCount", RECORDS_PER_REGION.to_string()),
        ("orderByFields", "BLDG_SQFT DESC".to_string()),
        ("f", "json".to_string()),
    ]
}

/// Turns a query response into prospects tagged with `region`, dropping records
/// that break the targeting rules even if the service returned them.
pub fn normalize(
    region: &str,
    resp: QueryResponse,
    rules: &ProspectRules,
) -> Result<Vec<Prospect>, ParcelError> {
    if let Some(err) = resp.error {
        return Err(ParcelError::Service {
            code: err.code.unwrap_or(0),
            message: err.message.unwrap_or_default(),
        });
    }

    let features = resp
        .features
        .ok_or_else(|| ParcelError::UnexpectedShape("features missing".into()))?;

    let prospects = features
        .iter()
        .filter_map(|f| {
            let a = &f.attributes;
            let sqft = number_attr(a, "BLDG_SQFT") as i64;
            let built_year = number_attr(a, "BUILT_YR") as i32;
            if !rules.accepts(sqft, built_year) {
                return None;
            }
            Some(Prospect {
                id: text_attr(a, "PARCEL_ID"),
                address: text_attr(a, "PARCEL_ADD"),
                city: text_attr(a, "PARCEL_CITY"),
                county: region.to_string(),
                sqft,
                built_year,
                age: rules.age_of(built_year),
                prop_class: text_attr(a, "PROP_CLASS"),
            })
        })
        .collect();

    Ok(prospects)
}
