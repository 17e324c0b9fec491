use serde::Deserialize;
use serde_json::{Map, Value};

// query response
//  ├── features[]
//  │    └── attributes
//  │         ├── PARCEL_ID
//  │         ├── PARCEL_ADD
//  │         ├── PARCEL_CITY
//  │         ├── BLDG_SQFT
//  │         ├── BUILT_YR
//  │         └── PROP_CLASS
//  └── error (only on failure, still HTTP 200)
//       ├── code
//       └── message

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub features: Option<Vec<Feature>>,
    pub error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceError {
    pub code: Option<i64>,
    pub message: Option<String>,
}

/// Attribute values arrive as numbers, numeric strings, or null depending on
/// the county layer. These readers never fail.
pub fn text_attr(attrs: &Map<String, Value>, key: &str) -> String {
    match attrs.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

pub fn number_attr(attrs: &Map<String, Value>, key: &str) -> f64 {
    let n = match attrs.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}
