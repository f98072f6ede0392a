//! Response gate: one-way latches guarding the response body.
//!
//! # Responsibilities
//! - Buffer the response body for a single request
//! - Suppress writes after the first body has been committed (`Closed`)
//! - Suppress further lifecycle progression once the response is done (`Finished`)
//!
//! # Design Decisions
//! - Modeled as an explicit state machine rather than independent booleans
//! - Transitions are one-way: Open → Closed, Open|Closed → Finished
//! - Late writes are silently dropped, never errors; a hook that fires after
//!   completion cannot corrupt an already-committed response

use bytes::{Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    /// Body writes are accepted, lifecycle continues.
    Open,
    /// Body is committed; writes are dropped but the lifecycle may continue.
    Closed,
    /// Terminal. No writes, and every lifecycle stage must stop.
    Finished,
}

/// Per-request write guard. Owned by the request's [`Context`](crate::context::Context),
/// never shared across requests.
#[derive(Debug)]
pub struct ResponseGate {
    state: GateState,
    body: BytesMut,
}

impl ResponseGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Open,
            body: BytesMut::new(),
        }
    }

    /// Append body bytes. No-op unless the gate is still open.
    pub fn write(&mut self, content: &[u8]) {
        if self.state == GateState::Open {
            self.body.extend_from_slice(content);
        }
    }

    /// Commit the body. Idempotent; a finished gate stays finished.
    pub fn close(&mut self) {
        if self.state == GateState::Open {
            self.state = GateState::Closed;
        }
    }

    /// Mark the response complete and commit the body. Idempotent.
    pub fn finish(&mut self) {
        self.state = GateState::Finished;
    }

    pub fn is_closed(&self) -> bool {
        self.state != GateState::Open
    }

    pub fn is_finished(&self) -> bool {
        self.state == GateState::Finished
    }

    pub(crate) fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}

impl Default for ResponseGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_gate_accepts_writes() {
        let mut gate = ResponseGate::new();
        gate.write(b"hello");
        gate.write(b" world");
        assert_eq!(&gate.into_body()[..], b"hello world");
    }

    #[test]
    fn closed_gate_drops_writes() {
        let mut gate = ResponseGate::new();
        gate.write(b"first");
        gate.close();
        gate.write(b"second");
        assert!(gate.is_closed());
        assert!(!gate.is_finished());
        assert_eq!(&gate.into_body()[..], b"first");
    }

    #[test]
    fn finish_is_idempotent_and_terminal() {
        let mut gate = ResponseGate::new();
        gate.finish();
        gate.finish();
        assert!(gate.is_finished());
        assert!(gate.is_closed());
        // Close after finish must not re-open anything.
        gate.close();
        assert!(gate.is_finished());
    }

    #[test]
    fn finish_after_close_still_finishes() {
        let mut gate = ResponseGate::new();
        gate.close();
        gate.finish();
        assert!(gate.is_finished());
    }
}
