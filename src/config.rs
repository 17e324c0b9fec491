// src/config.rs
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::ServerError;

pub const DEFAULT_DB_PATH: &str = "crm.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "LeadLedger/1.0";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub auth: AuthConfig,
    pub geocoder_url: String,
    pub user_agent: String,
    /// Minimum spacing between batch geocode requests.
    pub geocode_delay: Duration,
    /// Per-region request timeout for parcel queries.
    pub parcel_timeout: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub session_secret: Option<String>,
    pub secure_cookies: bool,
}

impl AuthConfig {
    /// The secret is only required by the web server; batch tools run without it.
    pub fn require_secret(&self) -> Result<&str, ServerError> {
        self.session_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServerError::Config("SESSION_SECRET is not set".into()))
    }
}

impl AppConfig {
    /// Loads `.env` when present, then reads the environment.
    pub fn from_env() -> Result<Self, ServerError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|e| ServerError::Config(format!("invalid BIND_ADDR {bind_raw}: {e}")))?;

        Ok(Self {
            db_path: lookup("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            bind_addr,
            max_workers: parse_or(&lookup, "MAX_WORKERS", 8)?,
            auth: AuthConfig {
                username: lookup("AUTH_USERNAME"),
                password: lookup("AUTH_PASSWORD"),
                session_secret: lookup("SESSION_SECRET"),
                secure_cookies: lookup("SECURE_COOKIES")
                    .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                    .unwrap_or(false),
            },
            geocoder_url: lookup("GEOCODER_URL")
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
            user_agent: lookup("GEOCODER_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            geocode_delay: Duration::from_millis(parse_or(&lookup, "GEOCODE_DELAY_MS", 1100)?),
            parcel_timeout: Duration::from_secs(parse_or(&lookup, "PARCEL_TIMEOUT_SECS", 30)?),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ServerError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ServerError::Config(format!("invalid {key} {raw}: {e}"))),
        None => Ok(default),
    }
}
