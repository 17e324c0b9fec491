// nominatim.rs
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::lead::location_query;
use crate::geocode::{Coordinates, GeocodeError, Geocoder, Lookup, ReverseAddress};

/// Client for a Nominatim-compatible service. The usage policy requires an
/// identifying User-Agent on every request.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<ReverseParts>,
    display_name: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ReverseParts {
    house_number: Option<String>,
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String, GeocodeError> {
        let resp = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .query(query)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }
        Ok(resp.text()?)
    }
}

impl Geocoder for NominatimGeocoder {
    fn forward(&self, address: Option<&str>, city: Option<&str>) -> Lookup<Coordinates> {
        let q = location_query(address, city);
        if q.is_empty() {
            return Lookup::NoQuery;
        }

        let query = [
            ("q", q),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
        ];
        match self.get_text("search", &query).and_then(|body| parse_search(&body)) {
            Ok(Some(coords)) => Lookup::Found(coords),
            Ok(None) => Lookup::NoMatch,
            Err(e) => Lookup::Failed(e),
        }
    }

    fn reverse(&self, lat: f64, lng: f64) -> Lookup<ReverseAddress> {
        let query = [
            ("lat", lat.to_string()),
            ("lon", lng.to_string()),
            ("format", "json".to_string()),
        ];
        match self.get_text("reverse", &query).and_then(|body| parse_reverse(&body)) {
            Ok(Some(found)) => Lookup::Found(found),
            Ok(None) => Lookup::NoMatch,
            Err(e) => Lookup::Failed(e),
        }
    }
}

/// First hit of a `/search` response, if any.
fn parse_search(body: &str) -> Result<Option<Coordinates>, GeocodeError> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).map_err(|e| GeocodeError::JsonParse(e.to_string()))?;

    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let lat = hit
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::UnexpectedShape(format!("lat {:?}", hit.lat)))?;
    let lng = hit
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::UnexpectedShape(format!("lon {:?}", hit.lon)))?;

    Ok(Some(Coordinates { lat, lng }))
}

fn parse_reverse(body: &str) -> Result<Option<ReverseAddress>, GeocodeError> {
    let resp: ReverseResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::JsonParse(e.to_string()))?;

    // "Unable to geocode" comes back as 200 with an error field.
    if resp.error.is_some() {
        return Ok(None);
    }

    let parts = resp.address.unwrap_or_default();
    let street = match (parts.house_number, parts.road) {
        (Some(n), Some(road)) => Some(format!("{n} {road}")),
        (None, Some(road)) => Some(road),
        _ => None,
    };
    let locality = parts.city.or(parts.town).or(parts.village).or(parts.hamlet);

    let address = street.or(resp.display_name);
    if address.is_none() && locality.is_none() {
        return Ok(None);
    }

    Ok(Some(ReverseAddress {
        address,
        city: locality,
    }))
}
