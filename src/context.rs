//! Cooperative cancellation for optic operations.
//!
//! A [`Context`] is passed to every primitive. It never interrupts work by
//! itself: composition boundaries call [`Context::check`] at every hop and
//! join the result into whatever error the hop produced, so a cancelled
//! operation ends at the next hop instead of needing a watchdog.
//!
//! # Examples
//!
//! ```
//! use lambars_optics::Context;
//!
//! let (context, handle) = Context::background().with_cancel();
//! assert!(context.check().is_ok());
//!
//! handle.cancel();
//! let error = context.check().unwrap_err();
//! assert!(error.is_cancelled());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::error::{Cancellation, OpticError, OpticResult};

#[derive(Debug, Default)]
struct CancellationState {
    cancelled: AtomicBool,
    reason: Mutex<Option<String>>,
}

impl CancellationState {
    fn cause(&self) -> Option<Cancellation> {
        if !self.cancelled.load(Ordering::Acquire) {
            return None;
        }
        Some(
            self.reason
                .lock()
                .clone()
                .map_or(Cancellation::Cancelled, Cancellation::CancelledWith),
        )
    }
}

/// Ambient cancellation and deadline state.
///
/// Cloning is cheap; clones observe the same cancellation. Child contexts
/// created with [`Context::with_cancel`] also observe every ancestor.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancellations: SmallVec<[Arc<CancellationState>; 2]>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derives a child context together with the handle that cancels it.
    ///
    /// Cancelling the handle does not affect the parent.
    #[must_use]
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let state = Arc::new(CancellationState::default());
        let mut child = self.clone();
        child.cancellations.push(Arc::clone(&state));
        (child, CancelHandle { state })
    }

    /// Derives a child context that expires at `deadline`.
    ///
    /// An earlier deadline inherited from the parent is kept.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let mut child = self.clone();
        child.deadline = Some(
            self.deadline
                .map_or(deadline, |inherited| inherited.min(deadline)),
        );
        child
    }

    /// Derives a child context that expires after `timeout`.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// The effective deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context stopped accepting work, if it has.
    #[must_use]
    pub fn cancellation(&self) -> Option<Cancellation> {
        if let Some(cause) = self
            .cancellations
            .iter()
            .find_map(|state| state.cause())
        {
            return Some(cause);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Cancellation::DeadlineExceeded),
            _ => None,
        }
    }

    /// Returns `true` once the context is cancelled or past its deadline.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation().is_some()
    }

    /// Fails with a cancellation error once the context is done.
    ///
    /// # Errors
    ///
    /// Returns an [`OpticError`] of kind `Cancelled` when the context was
    /// cancelled or its deadline passed.
    pub fn check(&self) -> OpticResult<()> {
        self.cancellation()
            .map_or(Ok(()), |cause| Err(OpticError::cancelled(cause)))
    }

    /// Joins the current cancellation state into `error`.
    ///
    /// The original error is kept; a cancellation is added only if the
    /// context is done and the error does not already carry one.
    #[must_use]
    pub fn join_cancellation(&self, error: OpticError) -> OpticError {
        match self.cancellation() {
            Some(cause) => error.join(OpticError::cancelled(cause)),
            None => error,
        }
    }
}

/// Cancels the [`Context`] it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<CancellationState>,
}

impl CancelHandle {
    /// Cancels the associated context.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
        tracing::debug!("optic context cancelled");
    }

    /// Cancels the associated context, recording `reason`.
    ///
    /// The first recorded reason wins.
    pub fn cancel_with(&self, reason: impl Into<String>) {
        let reason = reason.into();
        {
            let mut slot = self.state.reason.lock();
            if slot.is_none() {
                *slot = Some(reason.clone());
            }
        }
        self.state.cancelled.store(true, Ordering::Release);
        tracing::debug!(%reason, "optic context cancelled");
    }

    /// Returns `true` once [`CancelHandle::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }
}

static_assertions::assert_impl_all!(Context: Send, Sync, Clone);
static_assertions::assert_impl_all!(CancelHandle: Send, Sync, Clone);
