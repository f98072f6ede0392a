//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so a minimal (or absent) config still works.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener settings for the transport glue.
    pub server: ServerConfig,

    /// Session cookie, TTL, and signing secret.
    pub session: SessionConfig,

    /// Custom error-page files served per status code.
    pub status_pages: Vec<StatusPageConfig>,

    /// URL prefix → filesystem directory mappings for static assets.
    pub static_dirs: Vec<StaticDirConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the signed cookie carrying the session id.
    pub cookie_name: String,

    /// Idle TTL in seconds before a session expires.
    pub ttl_secs: u64,

    /// Cookie signing secret. The default is insecure by design and must be
    /// overridden per deployment; it is the sole forgery defense.
    pub secret: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "SESSID".to_string(),
            ttl_secs: 900,
            secret: "insecure-dev-secret".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusPageConfig {
    pub code: u16,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticDirConfig {
    pub prefix: String,
    pub dir: PathBuf,
}
