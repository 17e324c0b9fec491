// src/domain/lead.rs

use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ServerError;

/// Marketing channels offered by the lead form. `source` itself stays free text.
pub const SOURCES: &[&str] = &[
    "Website",
    "Referral",
    "Door Knock",
    "Facebook",
    "Google",
    "Yard Sign",
    "Other",
];

/// Pipeline stage of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Quoted,
    Won,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Quoted,
        LeadStatus::Won,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Quoted => "Quoted",
            LeadStatus::Won => "Won",
            LeadStatus::Lost => "Lost",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ServerError::BadRequest(format!("unknown status: {s}")))
    }
}

impl ToSql for LeadStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for LeadStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        raw.parse()
            .map_err(|e: ServerError| FromSqlError::Other(Box::new(e)))
    }
}

/// A stored lead row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub status: LeadStatus,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(with = "sqlite_datetime")]
    pub created_at: NaiveDateTime,
    #[serde(with = "sqlite_datetime")]
    pub updated_at: NaiveDateTime,
}

impl Lead {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }

    /// "address, city" with blanks skipped.
    pub fn location_line(&self) -> String {
        location_query(self.address.as_deref(), self.city.as_deref())
    }
}

/// Joins the non-blank address parts the way the geocoder expects them.
pub fn location_query(address: Option<&str>, city: Option<&str>) -> String {
    [address, city]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fields accepted when creating a lead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLead {
    #[serde(default)]
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub notes: Option<String>,
    /// Caller-supplied coordinates (map click). Both must be present to skip geocoding.
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl NewLead {
    pub fn validate(&self) -> Result<(), ServerError> {
        validate_name(&self.name)
    }

    pub fn explicit_coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }
}

/// A partial update. Absent keys keep their stored value; an explicit `null`
/// clears an optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub city: Option<Option<String>>,
    pub status: Option<LeadStatus>,
    #[serde(default, deserialize_with = "present")]
    pub source: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl LeadPatch {
    /// Applies the patch over `existing`. Returns the merged row and whether
    /// the location (address or city) changed value.
    pub fn merge_into(&self, existing: &Lead) -> (Lead, bool) {
        let mut merged = existing.clone();

        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            merged.phone = phone.clone();
        }
        if let Some(email) = &self.email {
            merged.email = email.clone();
        }
        if let Some(address) = &self.address {
            merged.address = address.clone();
        }
        if let Some(city) = &self.city {
            merged.city = city.clone();
        }
        if let Some(status) = self.status {
            merged.status = status;
        }
        if let Some(source) = &self.source {
            merged.source = source.clone();
        }
        if let Some(notes) = &self.notes {
            merged.notes = notes.clone();
        }

        let location_changed = merged.address != existing.address || merged.city != existing.city;
        (merged, location_changed)
    }

    pub fn explicit_coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }
}

pub fn validate_name(name: &str) -> Result<(), ServerError> {
    if name.trim().is_empty() {
        return Err(ServerError::BadRequest("name is required".into()));
    }
    Ok(())
}

// Distinguishes `"phone": null` (Some(None)) from a missing key (None).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Timestamps go over the wire in SQLite's `datetime('now')` shape.
mod sqlite_datetime {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&dt.format(FORMAT))
    }
}
