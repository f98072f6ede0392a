//! Configuration validation.
//!
//! Serde handles the syntactic layer; this module covers the semantic checks
//! and returns every violation, not just the first.

use crate::config::schema::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyBindAddress,
    ZeroSessionTtl,
    EmptySigningSecret,
    BadStatusCode(u16),
    BadStaticPrefix(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyBindAddress => write!(f, "server.bind_address is empty"),
            ValidationError::ZeroSessionTtl => write!(f, "session.ttl_secs must be positive"),
            ValidationError::EmptySigningSecret => write!(f, "session.secret is empty"),
            ValidationError::BadStatusCode(code) => {
                write!(f, "status page code {code} is outside 100..=599")
            }
            ValidationError::BadStaticPrefix(prefix) => {
                write!(f, "static prefix `{prefix}` must start with `/`")
            }
        }
    }
}

/// Semantic validation. Pure function; runs before the config is accepted.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }
    if config.session.ttl_secs == 0 {
        errors.push(ValidationError::ZeroSessionTtl);
    }
    if config.session.secret.is_empty() {
        errors.push(ValidationError::EmptySigningSecret);
    }
    for page in &config.status_pages {
        if !(100..=599).contains(&page.code) {
            errors.push(ValidationError::BadStatusCode(page.code));
        }
    }
    for dir in &config.static_dirs {
        if !dir.prefix.starts_with('/') {
            errors.push(ValidationError::BadStaticPrefix(dir.prefix.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
