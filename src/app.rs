//! Application object: registration surface and frozen serving state.
//!
//! # Responsibilities
//! - Collect routes, hooks, static paths, status pages, and the session
//!   storage during the single-threaded registration phase
//! - Freeze everything into an immutable `Arc<App>` shared by every request
//!
//! # Design Decisions
//! - No process-wide singletons: the application is an explicit value passed
//!   into the router, hooks, and session manager, so independent instances
//!   coexist (and tests stay isolated)
//! - Registration errors abort startup via `Result`; a bad route pattern is
//!   never silently skipped

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response};
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::context::Context;
use crate::dispatch::dispatcher;
use crate::handler::Handler;
use crate::hooks::{HookEvent, HookRegistry};
use crate::lifecycle::Shutdown;
use crate::routing::{HandlerFactory, PatternError, RoutingTable};
use crate::session::{MemoryStorage, SessionHandle, SessionManager, SessionStorage};
use crate::template::{BasicEngine, TemplateEngine};

/// The frozen application. Routing table and hook registry are read-only
/// from here on; all mutation happened in the builder.
pub struct App {
    config: AppConfig,
    router: RoutingTable,
    hooks: HookRegistry,
    sessions: Arc<SessionManager>,
    engine: Arc<dyn TemplateEngine>,
    status_pages: Arc<HashMap<u16, PathBuf>>,
    shutdown: Shutdown,
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::from_config(AppConfig::default())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub(crate) fn router(&self) -> &RoutingTable {
        &self.router
    }

    pub(crate) fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub(crate) fn engine(&self) -> &Arc<dyn TemplateEngine> {
        &self.engine
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    pub(crate) fn new_context(&self, request: Request<Bytes>) -> Context {
        Context::new(
            request,
            self.config.session.secret.clone(),
            self.status_pages.clone(),
        )
    }

    pub(crate) fn new_session_handle(&self) -> SessionHandle {
        SessionHandle::new(
            self.sessions.clone(),
            self.config.session.cookie_name.clone(),
        )
    }

    /// Drive one request through the lifecycle and produce the response.
    pub async fn dispatch(self: &Arc<Self>, request: Request<Bytes>) -> Response<Bytes> {
        dispatcher::dispatch(self, request).await
    }

    /// Serve requests from `listener` until shutdown. Thin transport glue;
    /// see [`crate::server`].
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> Result<(), std::io::Error> {
        crate::server::serve(self, listener).await
    }
}

/// Mutable registration surface. Consumed by [`AppBuilder::build`].
pub struct AppBuilder {
    config: AppConfig,
    router: RoutingTable,
    hooks: HookRegistry,
    storage: Option<Arc<dyn SessionStorage>>,
    engine: Arc<dyn TemplateEngine>,
    status_pages: HashMap<u16, PathBuf>,
}

impl AppBuilder {
    /// Start from a loaded configuration; its static directories and status
    /// pages are registered up front.
    pub fn from_config(config: AppConfig) -> Self {
        let mut router = RoutingTable::new();
        for dir in &config.static_dirs {
            router.set_static_path(dir.prefix.clone(), dir.dir.clone());
        }
        let status_pages = config
            .status_pages
            .iter()
            .map(|page| (page.code, page.path.clone()))
            .collect();
        Self {
            config,
            router,
            hooks: HookRegistry::new(),
            storage: None,
            engine: Arc::new(BasicEngine),
            status_pages,
        }
    }

    /// Register a route for a handler type constructed via `Default`.
    pub fn route<H>(self, pattern: &str) -> Result<Self, PatternError>
    where
        H: Handler + Default + 'static,
    {
        let name = short_type_name::<H>();
        self.route_with(
            pattern,
            name,
            Arc::new(|| Box::new(H::default()) as Box<dyn Handler>),
        )
    }

    /// Register a route with an explicit handler factory.
    pub fn route_with(
        mut self,
        pattern: &str,
        handler_name: &str,
        factory: HandlerFactory,
    ) -> Result<Self, PatternError> {
        self.router.add_rule(pattern, handler_name, factory)?;
        Ok(self)
    }

    /// Register a lifecycle hook.
    pub fn hook<F>(mut self, event: HookEvent, hook: F) -> Self
    where
        F: Fn(&mut crate::dispatch::Scope) + Send + Sync + 'static,
    {
        self.hooks.add(event, hook);
        self
    }

    /// Map a URL prefix to a static asset directory.
    pub fn static_path(mut self, prefix: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.router.set_static_path(prefix, dir);
        self
    }

    /// Serve the given file's bytes as the body whenever `code` is written.
    pub fn status_page(mut self, code: u16, path: impl Into<PathBuf>) -> Self {
        self.status_pages.insert(code, path.into());
        self
    }

    /// Replace the session storage backend.
    pub fn session_storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Replace the template engine collaborator.
    pub fn template_engine(mut self, engine: Arc<dyn TemplateEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Freeze the application.
    pub fn build(self) -> Arc<App> {
        let shutdown = Shutdown::new();
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::with_shutdown(&shutdown)));
        let sessions = Arc::new(SessionManager::new(storage, self.config.session.ttl_secs));
        Arc::new(App {
            config: self.config,
            router: self.router,
            hooks: self.hooks,
            sessions,
            engine: self.engine,
            status_pages: Arc::new(self.status_pages),
            shutdown,
        })
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
