//! Lifecycle state of a scheduled operation.
//!
//! The timelock exposes three boolean predicates per operation id. Exactly
//! one lifecycle state holds at any time, and the interpretation order is
//! fixed: done wins over ready, ready wins over pending, and an operation
//! no predicate claims is canceled. Callers must not reorder these checks.

use std::fmt;

use alloy_primitives::B256;
use serde::Serialize;

/// Opaque 32-byte operation identifier computed by the timelock.
pub type OperationId = B256;

/// Lifecycle state of a scheduled operation.
///
/// Transition order without cancellation: `Pending` → `Ready` → `Done`.
/// `Canceled` is reachable from `Pending` or `Ready` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Pending,
    Ready,
    Done,
    Canceled,
}

impl LifecycleState {
    /// Interpret the three status predicates with the fixed precedence.
    pub fn from_flags(done: bool, ready: bool, pending: bool) -> Self {
        if done {
            Self::Done
        } else if ready {
            Self::Ready
        } else if pending {
            Self::Pending
        } else {
            Self::Canceled
        }
    }

    /// Whether the operation can still be canceled.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Ready)
    }

    /// Whether the operation can be executed now.
    pub fn is_executable(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Done => "done",
            Self::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

/// Accumulator for status predicate results that arrive independently.
///
/// Resolves to a state only once all three results are present; a partial
/// result set never yields a determination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    done: Option<bool>,
    ready: Option<bool>,
    pending: Option<bool>,
}

impl StatusFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_done(&mut self, done: bool) -> &mut Self {
        self.done = Some(done);
        self
    }

    pub fn set_ready(&mut self, ready: bool) -> &mut Self {
        self.ready = Some(ready);
        self
    }

    pub fn set_pending(&mut self, pending: bool) -> &mut Self {
        self.pending = Some(pending);
        self
    }

    /// The state, if all three predicate results have been recorded.
    pub fn resolve(&self) -> Option<LifecycleState> {
        Some(LifecycleState::from_flags(
            self.done?,
            self.ready?,
            self.pending?,
        ))
    }
}
