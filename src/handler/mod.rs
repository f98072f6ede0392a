//! Handler contract.
//!
//! Every route points at a type implementing [`Handler`]. A fresh instance is
//! constructed per request; instances are never pooled or reused. The verb
//! methods all default to 405 "Method Not Allowed", so a concrete handler
//! overrides exactly the verbs it supports. Verb-to-method dispatch is an
//! explicit match, resolved at compile time.

use http::{Method, StatusCode};

use crate::dispatch::Scope;

/// The HTTP verbs a handler can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Head,
    Delete,
    Put,
    Patch,
    Options,
}

impl Verb {
    /// Map a request method onto the verb set. Unrecognized methods resolve
    /// to `None` and are answered with 405 by the dispatcher.
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Verb::Get),
            Method::POST => Some(Verb::Post),
            Method::HEAD => Some(Verb::Head),
            Method::DELETE => Some(Verb::Delete),
            Method::PUT => Some(Verb::Put),
            Method::PATCH => Some(Verb::Patch),
            Method::OPTIONS => Some(Verb::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "Get",
            Verb::Post => "Post",
            Verb::Head => "Head",
            Verb::Delete => "Delete",
            Verb::Put => "Put",
            Verb::Patch => "Patch",
            Verb::Options => "Options",
        }
    }
}

/// Per-route request handler.
///
/// All methods receive the request [`Scope`], which bundles the context,
/// template, and session handle for the request.
pub trait Handler: Send {
    /// Called once before any hook or verb method. The default does nothing;
    /// handlers override it to prime the template or inspect the session.
    fn init(&mut self, scope: &mut Scope, handler_name: &str) {
        let _ = (scope, handler_name);
    }

    fn get(&mut self, scope: &mut Scope) {
        method_not_allowed(scope);
    }

    fn post(&mut self, scope: &mut Scope) {
        method_not_allowed(scope);
    }

    fn head(&mut self, scope: &mut Scope) {
        method_not_allowed(scope);
    }

    fn delete(&mut self, scope: &mut Scope) {
        method_not_allowed(scope);
    }

    fn put(&mut self, scope: &mut Scope) {
        method_not_allowed(scope);
    }

    fn patch(&mut self, scope: &mut Scope) {
        method_not_allowed(scope);
    }

    fn options(&mut self, scope: &mut Scope) {
        method_not_allowed(scope);
    }

    /// Render stage. The default delegates to [`Scope::render`], which is a
    /// no-op unless a template source was attached.
    fn render(&mut self, scope: &mut Scope) {
        scope.render();
    }

    /// Output stage. The default writes the rendered template, if any.
    fn output(&mut self, scope: &mut Scope) {
        scope.output();
    }
}

fn method_not_allowed(scope: &mut Scope) {
    scope
        .context
        .error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
}

/// Explicit verb dispatch table.
pub(crate) fn invoke(handler: &mut dyn Handler, verb: Verb, scope: &mut Scope) {
    match verb {
        Verb::Get => handler.get(scope),
        Verb::Post => handler.post(scope),
        Verb::Head => handler.head(scope),
        Verb::Delete => handler.delete(scope),
        Verb::Put => handler.put(scope),
        Verb::Patch => handler.patch(scope),
        Verb::Options => handler.options(scope),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_mapping_covers_the_fixed_set() {
        assert_eq!(Verb::from_method(&Method::GET), Some(Verb::Get));
        assert_eq!(Verb::from_method(&Method::OPTIONS), Some(Verb::Options));
        assert_eq!(Verb::from_method(&Method::TRACE), None);
    }
}
