//! Template seam.
//!
//! Template execution belongs to an external engine behind [`TemplateEngine`];
//! this module only owns the per-request state: the attached source, the
//! variable map, and the at-most-once rendered result. The render stage itself
//! lives on [`Scope::render`](crate::dispatch::Scope::render) because it is
//! wrapped in the `BeforeRender`/`AfterRender` hooks.

use std::collections::HashMap;

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("template render failed: {0}")]
pub struct RenderError(pub String);

/// Opaque template collaborator.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, source: &str, vars: &HashMap<String, String>) -> Result<String, RenderError>;
}

/// Minimal `{{name}}` substitution engine. Stands in when no real engine is
/// registered on the application.
pub struct BasicEngine;

impl TemplateEngine for BasicEngine {
    fn render(&self, source: &str, vars: &HashMap<String, String>) -> Result<String, RenderError> {
        let mut out = source.to_string();
        for (name, value) in vars {
            out = out.replace(&format!("{{{{{name}}}}}"), value);
        }
        Ok(out)
    }
}

/// Per-request template state.
pub struct Template {
    source: Option<String>,
    vars: HashMap<String, String>,
    result: Option<Bytes>,
}

impl Template {
    pub(crate) fn new() -> Self {
        Self {
            source: None,
            vars: HashMap::new(),
            result: None,
        }
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
    }

    /// Attach a template file. Returns false (and attaches nothing) when the
    /// file is unreadable.
    pub fn set_source_file(&mut self, path: &str) -> bool {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                self.source = Some(content);
                true
            }
            Err(_) => false,
        }
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub(crate) fn source_str(&self) -> &str {
        self.source.as_deref().unwrap_or("")
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub(crate) fn vars(&self) -> &HashMap<String, String> {
        &self.vars
    }

    pub(crate) fn is_rendered(&self) -> bool {
        self.result.is_some()
    }

    pub(crate) fn store_result(&mut self, bytes: Vec<u8>) {
        self.result = Some(Bytes::from(bytes));
    }

    /// Rendered bytes; empty before a successful render.
    pub fn result(&self) -> &[u8] {
        self.result.as_deref().unwrap_or(&[])
    }

    /// Replace the rendered result. No-op before the template has rendered,
    /// mirroring the at-most-once parse contract.
    pub fn set_result(&mut self, bytes: impl Into<Bytes>) {
        if self.result.is_some() {
            self.result = Some(bytes.into());
        }
    }
}
