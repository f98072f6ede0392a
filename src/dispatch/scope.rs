//! Request scope: the bundle handed to handlers and hooks.

use std::sync::Arc;

use http::StatusCode;

use crate::app::App;
use crate::context::Context;
use crate::hooks::HookEvent;
use crate::session::SessionHandle;
use crate::template::Template;

/// Everything a handler or hook may touch for the current request: the
/// context, the template, and the session handle. Constructed per request by
/// the dispatcher; shares the application by reference.
pub struct Scope {
    app: Arc<App>,
    pub context: Context,
    pub template: Template,
    pub session: SessionHandle,
}

impl Scope {
    pub(crate) fn new(
        app: Arc<App>,
        context: Context,
        template: Template,
        session: SessionHandle,
    ) -> Self {
        Self {
            app,
            context,
            template,
            session,
        }
    }

    pub fn app(&self) -> &Arc<App> {
        &self.app
    }

    pub fn write_string(&mut self, content: &str) {
        self.write_bytes(content.as_bytes());
    }

    /// Write a response body, wrapped in the `BeforeOutput`/`AfterOutput`
    /// hooks. The gate closes afterwards, so at most one body is ever
    /// written; later writes are dropped silently.
    pub fn write_bytes(&mut self, content: &[u8]) {
        if self.context.is_closed() {
            return;
        }
        let app = self.app.clone();
        app.hooks().fire(HookEvent::BeforeOutput, self);
        if self.context.is_finished() {
            return;
        }
        self.context.write(content);
        app.hooks().fire(HookEvent::AfterOutput, self);
        if self.context.is_finished() {
            return;
        }
        self.context.close();
    }

    /// Status, body, and finish in one step.
    pub fn abort(&mut self, code: StatusCode, content: &str) {
        self.context.write_status(code);
        self.write_string(content);
        self.context.finish();
    }

    /// Render the attached template through the application's engine,
    /// wrapped in `BeforeRender`/`AfterRender`. A template renders at most
    /// once per request; a second call is a no-op reporting failure. A render
    /// failure is reported as `false` without finishing the request, leaving
    /// the error-page decision to hook or handler code.
    pub fn render(&mut self) -> bool {
        if !self.template.has_source() {
            return false;
        }
        if self.template.is_rendered() {
            return false;
        }
        let app = self.app.clone();
        app.hooks().fire(HookEvent::BeforeRender, self);
        if self.context.is_finished() {
            return true;
        }
        let rendered = match app
            .engine()
            .render(self.template.source_str(), self.template.vars())
        {
            Ok(out) => out,
            Err(err) => {
                tracing::warn!(error = %err, "template render failed");
                return false;
            }
        };
        self.template.store_result(rendered.into_bytes());
        app.hooks().fire(HookEvent::AfterRender, self);
        true
    }

    /// Write the rendered template, if any bytes were produced.
    pub fn output(&mut self) {
        if self.template.result().is_empty() {
            return;
        }
        let content = self.template.result().to_vec();
        self.write_bytes(&content);
    }

    pub(crate) fn into_response(self) -> http::Response<bytes::Bytes> {
        self.context.into_response()
    }
}
