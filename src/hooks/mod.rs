//! Hook registry: the fixed interception points of the request lifecycle.
//!
//! # Data Flow
//! ```text
//! Registration (startup): AppBuilder::hook(event, callback)
//!     → ordered callback list per event
//!
//! Request time: dispatcher / render / output stages
//!     → fire(event, scope): callbacks in registration order
//!     → stop as soon as the response gate reports finished
//! ```
//!
//! # Design Decisions
//! - Events are a closed enum, so a typo is a compile error, while a hook
//!   registered for an event that never fires is silently tolerated
//! - Firing is synchronous on the request's worker; a hook that finishes the
//!   response aborts both the remaining callbacks and the calling stage

use std::collections::HashMap;
use std::sync::Arc;

use crate::dispatch::Scope;
use crate::handler::Verb;

/// The fixed lifecycle event set. Each fires at most once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    AfterInit,
    BeforeMethod(Verb),
    AfterMethod(Verb),
    BeforeRender,
    AfterRender,
    BeforeOutput,
    AfterOutput,
}

/// A lifecycle observer. Receives the request scope (context, template,
/// session) and may end processing early by finishing the response.
pub type HookFn = Arc<dyn Fn(&mut Scope) + Send + Sync>;

/// Ordered callback lists per event. Write-once during application setup,
/// read-only while serving.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<HookEvent, Vec<HookFn>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback to the event's firing order.
    pub fn add<F>(&mut self, event: HookEvent, hook: F)
    where
        F: Fn(&mut Scope) + Send + Sync + 'static,
    {
        self.hooks.entry(event).or_default().push(Arc::new(hook));
    }

    /// Invoke callbacks in registration order. Stops immediately once the
    /// scope's response gate is finished; the calling stage must then also
    /// stop. This is the single cross-cutting abort mechanism.
    pub fn fire(&self, event: HookEvent, scope: &mut Scope) {
        let Some(list) = self.hooks.get(&event) else {
            return;
        };
        for hook in list {
            hook(scope);
            if scope.context.is_finished() {
                return;
            }
        }
    }

    pub fn registered(&self, event: HookEvent) -> usize {
        self.hooks.get(&event).map_or(0, Vec::len)
    }
}
