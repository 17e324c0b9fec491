// src/auth/sessions.rs
use astra::Request;

use crate::auth::token::{generate_nonce, secrets_match, sign, verify};
use crate::config::AuthConfig;

pub const SESSION_COOKIE_NAME: &str = "crm_session";
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

/// Issues and checks signed session cookies. There are no server-side
/// sessions: the cookie carries its own expiry, signed with the shared secret.
#[derive(Clone)]
pub struct SessionKeys {
    secret: String,
    secure: bool,
}

impl SessionKeys {
    pub fn new(secret: impl Into<String>, secure: bool) -> Self {
        Self {
            secret: secret.into(),
            secure,
        }
    }

    /// Token of the form `expires_at.nonce.signature`.
    pub fn issue(&self, now: i64) -> String {
        let expires_at = now + SESSION_TTL_SECS;
        sign(&self.secret, &format!("{expires_at}.{}", generate_nonce()))
    }

    pub fn is_valid(&self, token: &str, now: i64) -> bool {
        let Some(value) = verify(&self.secret, token) else {
            return false;
        };
        value
            .split_once('.')
            .and_then(|(exp, _nonce)| exp.parse::<i64>().ok())
            .map(|expires_at| expires_at > now)
            .unwrap_or(false)
    }

    pub fn set_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_TTL_SECS}"
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    pub fn clear_cookie(&self) -> String {
        format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }

    /// True when the request carries a valid session cookie.
    pub fn is_authenticated(&self, req: &Request, now: i64) -> bool {
        session_token(req)
            .map(|t| self.is_valid(&t, now))
            .unwrap_or(false)
    }
}

/// Value of the session cookie, if the request has one.
pub fn session_token(req: &Request) -> Option<String> {
    req.headers()
        .get_all("cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.to_string())
}

/// Compares against the configured pair. Missing configuration never matches.
pub fn check_credentials(cfg: &AuthConfig, username: &str, password: &str) -> bool {
    match (&cfg.username, &cfg.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => {
            // evaluate both to keep timing independent of which one failed
            let user_ok = secrets_match(u.as_bytes(), username.as_bytes());
            let pass_ok = secrets_match(p.as_bytes(), password.as_bytes());
            user_ok & pass_ok
        }
        _ => false,
    }
}
