//! The request lifecycle state machine.
//!
//! # Stages
//! ```text
//! resolve → construct → init → AfterInit → verb resolution
//!     → BeforeMethod<verb> → verb method → AfterMethod<verb>
//!     → render → output → finish
//! ```
//! Every stage after construct checks the response gate and stops as soon as
//! the request is finished. No stage retries; routing misses and unsupported
//! methods degrade to client-visible status codes.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Request, Response, StatusCode};

use crate::app::App;
use crate::dispatch::Scope;
use crate::handler::{self, Verb};
use crate::hooks::HookEvent;
use crate::routing::Resolution;
use crate::template::Template;

/// Drive one request through the full lifecycle.
pub(crate) async fn dispatch(app: &Arc<App>, request: Request<Bytes>) -> Response<Bytes> {
    let path = request.uri().path().to_string();
    let method = request.method().clone();
    tracing::debug!(method = %method, path = %path, "dispatching request");

    // Stage 1: resolve. Static assets bypass the handler lifecycle entirely.
    let (mut handler, handler_name, captures) = match app.router().resolve(&path, &method) {
        Resolution::StaticFile(file) => return serve_static(&file).await,
        Resolution::NotFound => {
            tracing::debug!(path = %path, "no route matched");
            let mut context = app.new_context(request);
            context.error(StatusCode::NOT_FOUND, "Not Found");
            context.finish();
            return context.into_response();
        }
        Resolution::Handler { rule, captures } => (
            rule.make_handler(),
            rule.handler_name().to_string(),
            captures,
        ),
    };

    // Stage 2: construct. One handler instance per request, never reused.
    let mut context = app.new_context(request);
    for (name, value) in captures {
        context.add_param(name, value);
    }
    let mut scope = Scope::new(
        app.clone(),
        context,
        Template::new(),
        app.new_session_handle(),
    );

    // Stage 3: handler init.
    handler.init(&mut scope, &handler_name);
    if scope.context.is_finished() {
        return scope.into_response();
    }

    // Stage 4.
    app.hooks().fire(HookEvent::AfterInit, &mut scope);
    if scope.context.is_finished() {
        return scope.into_response();
    }

    // Stage 5: verb resolution. Unrecognized methods answer 405 and halt;
    // no further hooks fire for this request.
    let Some(verb) = Verb::from_method(&method) else {
        scope
            .context
            .error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        scope.context.finish();
        return scope.into_response();
    };

    // Stages 6-8: the verb method, bracketed by its hooks.
    tracing::debug!(verb = verb.as_str(), handler = %handler_name, "invoking verb method");
    app.hooks().fire(HookEvent::BeforeMethod(verb), &mut scope);
    if scope.context.is_finished() {
        return scope.into_response();
    }

    handler::invoke(handler.as_mut(), verb, &mut scope);
    if scope.context.is_finished() {
        return scope.into_response();
    }

    app.hooks().fire(HookEvent::AfterMethod(verb), &mut scope);
    if scope.context.is_finished() {
        return scope.into_response();
    }

    // Stage 9: render. The render/output hooks fire inside the scope's
    // render and write paths, not here.
    handler.render(&mut scope);
    if scope.context.is_finished() {
        return scope.into_response();
    }

    // Stage 10: output.
    handler.output(&mut scope);

    // Stage 11: finish. Idempotent.
    scope.context.finish();
    scope.into_response()
}

/// Stream a static file straight from disk.
async fn serve_static(file: &Path) -> Response<Bytes> {
    match tokio::fs::read(file).await {
        Ok(content) => {
            let mut response = Response::new(Bytes::from(content));
            if let Some(ct) = content_type_for(file) {
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static(ct));
            }
            response
        }
        Err(err) => {
            tracing::debug!(file = %file.display(), error = %err, "static file unreadable");
            let mut response = Response::new(Bytes::from_static(b"Not Found"));
            *response.status_mut() = StatusCode::NOT_FOUND;
            response
        }
    }
}

fn content_type_for(file: &Path) -> Option<&'static str> {
    crate::context::mime_for(file.extension()?.to_str()?)
}
