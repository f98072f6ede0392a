//! Per-request session handle.

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::Context;
use crate::session::manager::SessionManager;

/// Per-request view of one session, bound to the signed session cookie.
///
/// The backing id and data map resolve lazily on first access: a verified
/// cookie supplies the id, otherwise a fresh id is minted and written back
/// as a signed cookie. Every mutation persists the full map immediately.
pub struct SessionHandle {
    manager: Arc<SessionManager>,
    cookie_name: String,
    session_id: Option<String>,
    data: Option<HashMap<String, String>>,
}

impl SessionHandle {
    pub(crate) fn new(manager: Arc<SessionManager>, cookie_name: String) -> Self {
        Self {
            manager,
            cookie_name,
            session_id: None,
            data: None,
        }
    }

    fn ensure(&mut self, ctx: &mut Context) {
        if self.session_id.is_none() {
            let id = match ctx.secure_cookie(&self.cookie_name) {
                Some(id) if !id.is_empty() => id,
                _ => {
                    let id = self.manager.create_session_id();
                    ctx.set_secure_cookie(&self.cookie_name, &id, 0);
                    id
                }
            };
            self.session_id = Some(id);
        }
        if self.data.is_none() {
            let id = self.session_id.as_deref().unwrap_or_default();
            self.data = Some(self.manager.get(id));
        }
    }

    /// The resolved session id, minting one if needed.
    pub fn id(&mut self, ctx: &mut Context) -> String {
        self.ensure(ctx);
        self.session_id.clone().unwrap_or_default()
    }

    pub fn get(&mut self, ctx: &mut Context, key: &str) -> Option<String> {
        self.ensure(ctx);
        self.data.as_ref().and_then(|data| data.get(key).cloned())
    }

    pub fn set(&mut self, ctx: &mut Context, key: impl Into<String>, value: impl Into<String>) {
        self.ensure(ctx);
        if let Some(data) = self.data.as_mut() {
            data.insert(key.into(), value.into());
        }
        self.persist();
    }

    pub fn remove(&mut self, ctx: &mut Context, key: &str) {
        self.ensure(ctx);
        if let Some(data) = self.data.as_mut() {
            data.remove(key);
        }
        self.persist();
    }

    fn persist(&self) {
        if let (Some(id), Some(data)) = (self.session_id.as_deref(), self.data.as_ref()) {
            self.manager.set(id, data.clone());
        }
    }
}
