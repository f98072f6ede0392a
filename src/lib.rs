//! gantry: the request-dispatch core of a small controller-based web
//! framework.
//!
//! # Architecture Overview
//! ```text
//! Request
//!     → routing   (exact rules, then compiled pattern rules, in order)
//!     → dispatch  (lifecycle: init → hooks → verb → render → output,
//!                  gated by one-way response latches)
//!     → handler   (per-route type; verbs default to 405)
//!
//! Cross-cutting:
//!     hooks    - fixed named lifecycle events, early-abort capable
//!     session  - pluggable storage, signed session cookie, TTL sweep
//!     config   - TOML schema + semantic validation
//!     security - cookie signing (HMAC-SHA256)
//! ```

pub mod app;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod handler;
pub mod hooks;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod server;
pub mod session;
pub mod template;

pub use app::{App, AppBuilder};
pub use config::{load_config, AppConfig, ConfigError};
pub use context::{Context, UploadError, UploadFile};
pub use dispatch::{ResponseGate, Scope};
pub use handler::{Handler, Verb};
pub use hooks::{HookEvent, HookRegistry};
pub use lifecycle::Shutdown;
pub use observability::init_logging;
pub use routing::{PatternError, RoutingTable};
pub use session::{MemoryStorage, SessionHandle, SessionManager, SessionStorage};
pub use template::{BasicEngine, RenderError, Template, TemplateEngine};
