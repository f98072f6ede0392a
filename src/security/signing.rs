//! Cookie signing.
//!
//! A secure cookie carries `base64(value)|expiry|signature`, where the
//! signature is a keyed hash over the cookie name, the encoded value, and the
//! expiry field. The signing secret is the sole forgery defense, so any
//! deployment must override the insecure default from the config.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the hex-encoded signature for one cookie.
pub fn cookie_signature(secret: &str, name: &str, encoded_value: &str, timestamp: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(name.as_bytes());
    mac.update(encoded_value.as_bytes());
    mac.update(timestamp.as_bytes());
    hex(&mac.finalize().into_bytes())
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
