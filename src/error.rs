//! Error types for optic operations.
//!
//! Every fallible operation returns [`OpticResult`]. An [`OpticError`] holds
//! one or more [`ErrorKind`]s (an operation error can be *joined* with an
//! ambient cancellation, never replaced by it) together with the optic path
//! the error travelled through, innermost frame first.
//!
//! # Examples
//!
//! ```
//! use lambars_optics::{Cancellation, OpticError};
//!
//! let error = OpticError::empty_get().join(OpticError::cancelled(Cancellation::DeadlineExceeded));
//! assert!(error.is_empty_get());
//! assert!(error.is_cancelled());
//! assert_eq!(error.to_string(), "no focus found for single-focus get; deadline exceeded");
//! ```

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::diagnostics::Description;

/// Result type alias for optic operations.
pub type OpticResult<T> = Result<T, OpticError>;

/// Why a context stopped accepting work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Cancellation {
    /// The context was cancelled explicitly.
    #[error("operation cancelled")]
    Cancelled,
    /// The context was cancelled with a reason.
    #[error("operation cancelled: {0}")]
    CancelledWith(String),
    /// The context deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// A producer pushed a record after its consumer asked it to stop.
///
/// This indicates a bug in an optic or combinator, not a data error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("sequence produced {rejected} record(s) after its consumer stopped")]
pub struct SequenceViolation {
    /// Number of records that were rejected.
    pub rejected: usize,
}

/// An error raised by a caller-supplied modify or fold function.
#[derive(Debug, Clone)]
pub struct MapFailure(Arc<dyn StdError + Send + Sync + 'static>);

impl MapFailure {
    /// Returns the wrapped error.
    #[must_use]
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl fmt::Display for MapFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, formatter)
    }
}

/// The individual failure classes an [`OpticError`] can carry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ErrorKind {
    /// A single-focus operation found no focus.
    #[error("no focus found for single-focus get")]
    EmptyGet,

    /// A narrowing optic could not convert the focus.
    #[error("cast mismatch: expected {expected}, found {found}")]
    CastMismatch {
        /// The expected type or shape.
        expected: Cow<'static, str>,
        /// What was found instead.
        found: Cow<'static, str>,
    },

    /// An index mapper could not recover a component of a merged index.
    #[error("index mapper {mapper} could not recover the {missing} index")]
    IndexMismatch {
        /// Description of the mapper.
        mapper: Cow<'static, str>,
        /// Which component was missing (`"left"` or `"right"`).
        missing: &'static str,
    },

    /// The ambient context was cancelled or its deadline passed.
    #[error(transparent)]
    Cancelled(#[from] Cancellation),

    /// A caller-supplied function failed.
    #[error("map function failed: {0}")]
    UserMap(MapFailure),

    /// A producer violated the push-sequence contract.
    #[error(transparent)]
    SequenceViolation(#[from] SequenceViolation),
}

/// An error produced while running an optic.
///
/// Carries the joined [`ErrorKind`]s and the optic path, innermost first.
#[derive(Debug, Clone)]
pub struct OpticError {
    kinds: SmallVec<[ErrorKind; 1]>,
    trace: SmallVec<[Description; 4]>,
}

impl OpticError {
    /// Creates an error of a single kind with an empty trace.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        let mut kinds = SmallVec::new();
        kinds.push(kind);
        Self {
            kinds,
            trace: SmallVec::new(),
        }
    }

    /// A single-focus operation found no focus.
    #[must_use]
    pub fn empty_get() -> Self {
        Self::new(ErrorKind::EmptyGet)
    }

    /// A narrowing conversion failed.
    #[must_use]
    pub fn cast_mismatch(
        expected: impl Into<Cow<'static, str>>,
        found: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrorKind::CastMismatch {
            expected: expected.into(),
            found: found.into(),
        })
    }

    /// An index mapper could not recover the `missing` component.
    #[must_use]
    pub fn index_mismatch(mapper: impl Into<Cow<'static, str>>, missing: &'static str) -> Self {
        Self::new(ErrorKind::IndexMismatch {
            mapper: mapper.into(),
            missing,
        })
    }

    /// The context was cancelled.
    #[must_use]
    pub fn cancelled(cause: Cancellation) -> Self {
        Self::new(ErrorKind::Cancelled(cause))
    }

    /// Wraps an error raised by a caller-supplied function.
    #[must_use]
    pub fn user<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::new(ErrorKind::UserMap(MapFailure(Arc::new(error))))
    }

    /// Wraps a plain message raised by a caller-supplied function.
    #[must_use]
    pub fn user_message(message: impl Into<String>) -> Self {
        let message: String = message.into();
        let boxed: Box<dyn StdError + Send + Sync> = message.into();
        Self::new(ErrorKind::UserMap(MapFailure(Arc::from(boxed))))
    }

    /// Joins `other` into this error.
    ///
    /// Kinds already present are not duplicated for cancellations; the trace
    /// of `self` is kept.
    #[must_use]
    pub fn join(mut self, other: Self) -> Self {
        for kind in other.kinds {
            if matches!(kind, ErrorKind::Cancelled(_)) && self.is_cancelled() {
                continue;
            }
            self.kinds.push(kind);
        }
        if self.trace.is_empty() {
            self.trace = other.trace;
        }
        self
    }

    /// Appends a trace frame.
    #[must_use]
    pub fn with_frame(mut self, frame: Description) -> Self {
        self.trace.push(frame);
        self
    }

    /// Tags the error with `origin` if it is a leaf.
    pub(crate) fn originated_in(mut self, origin: &Description) -> Self {
        if origin.is_leaf() {
            self.trace.push(origin.clone());
        }
        self
    }

    /// Appends every leaf of `path`, innermost first.
    pub(crate) fn passed_through(mut self, path: &Description) -> Self {
        for leaf in path.leaves().into_iter().rev() {
            self.trace.push(leaf.clone());
        }
        self
    }

    /// The joined kinds, in the order they were observed.
    pub fn kinds(&self) -> impl Iterator<Item = &ErrorKind> {
        self.kinds.iter()
    }

    /// The optic path, innermost frame first.
    #[must_use]
    pub fn trace(&self) -> &[Description] {
        &self.trace
    }

    /// Returns `true` if any joined kind is [`ErrorKind::EmptyGet`].
    #[must_use]
    pub fn is_empty_get(&self) -> bool {
        self.kinds.iter().any(|kind| matches!(kind, ErrorKind::EmptyGet))
    }

    /// Returns `true` if any joined kind is [`ErrorKind::Cancelled`].
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.kinds
            .iter()
            .any(|kind| matches!(kind, ErrorKind::Cancelled(_)))
    }

    /// Returns `true` if any joined kind is [`ErrorKind::IndexMismatch`].
    #[must_use]
    pub fn is_index_mismatch(&self) -> bool {
        self.kinds
            .iter()
            .any(|kind| matches!(kind, ErrorKind::IndexMismatch { .. }))
    }

    /// Returns `true` if any joined kind is [`ErrorKind::UserMap`].
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        self.kinds
            .iter()
            .any(|kind| matches!(kind, ErrorKind::UserMap(_)))
    }

    /// Returns `true` if any joined kind is [`ErrorKind::SequenceViolation`].
    #[must_use]
    pub fn is_sequence_violation(&self) -> bool {
        self.kinds
            .iter()
            .any(|kind| matches!(kind, ErrorKind::SequenceViolation(_)))
    }

    /// The joined kinds rendered on one line, without the trace.
    #[must_use]
    pub fn summary(&self) -> String {
        self.kinds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for OpticError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.summary())
    }
}

impl StdError for OpticError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.kinds.iter().find_map(|kind| match kind {
            ErrorKind::UserMap(failure) => {
                let inner: &(dyn StdError + 'static) = failure.inner();
                Some(inner)
            }
            _ => None,
        })
    }
}

impl From<ErrorKind> for OpticError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<Cancellation> for OpticError {
    fn from(cause: Cancellation) -> Self {
        Self::cancelled(cause)
    }
}

impl From<SequenceViolation> for OpticError {
    fn from(violation: SequenceViolation) -> Self {
        Self::new(ErrorKind::SequenceViolation(violation))
    }
}
