// src/auth/token.rs
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const DEFAULT_NONCE_BYTES: usize = 16;

/// Random URL-safe nonce from the OS RNG.
pub fn generate_nonce() -> String {
    let mut rng = OsRng;
    generate_token(&mut rng, DEFAULT_NONCE_BYTES)
}

/// Generate a URL-safe token from random bytes.
pub fn generate_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64_url_nopad(&buf)
}

type HmacSha256 = Hmac<Sha256>;

fn keyed(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length")
}

/// HMAC-SHA256 (RFC 2104).
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut mac = keyed(key);
    mac.update(message);
    mac.finalize().into_bytes().into()
}

/// `value.signature`, signature being base64url HMAC of `value`.
pub fn sign(secret: &str, value: &str) -> String {
    let sig = hmac_sha256(secret.as_bytes(), value.as_bytes());
    format!("{value}.{}", base64_url_nopad(&sig))
}

/// Returns the signed value when the signature checks out.
pub fn verify<'a>(secret: &str, token: &'a str) -> Option<&'a str> {
    let (value, sig) = token.rsplit_once('.')?;
    let sig = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(sig)
        .ok()?;
    let mut mac = keyed(secret.as_bytes());
    mac.update(value.as_bytes());
    mac.verify_slice(&sig).ok().map(|_| value)
}

/// Compares SHA-256 digests, so neither the content nor the length of the
/// secret side shows up in timing.
pub fn secrets_match(expected: &[u8], given: &[u8]) -> bool {
    hashes_equal(&Sha256::digest(expected), &Sha256::digest(given))
}

/// Constant-time-ish compare (simple and sufficient here).
pub fn hashes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn base64_url_nopad(bytes: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
