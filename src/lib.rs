//! # lambars-optics
//!
//! A composition engine for optics: lenses, prisms, isos and traversals
//! that compose into a single optic with typed capabilities.
//!
//! ## Overview
//!
//! - **Optic contract**: [`Optic`] with the [`Getter`], [`Modifier`] and
//!   [`ReverseGetter`] capabilities, declared through zero-sized tags in
//!   [`capability`].
//! - **Composition**: [`compose`] and friends build a [`Composed`] optic
//!   dispatched on the operands' cardinalities, with indices merged by an
//!   [`index::IndexMapper`]. Identities are elided at compile time.
//! - **Sequences**: foci are pushed into a [`sequence::Sink`] that the
//!   consumer can stop at any time.
//! - **Diagnostics**: every error carries the path of leaf optics it went
//!   through, rendered by [`diagnostics::render_trace`].
//! - **Cancellation**: a [`Context`] is observed at every composition hop.
//! - **Folds** and **combinators** build on the engine.
//!
//! ## Feature Flags
//!
//! - `fold`: reducers and [`fold::reduce`] (default)
//! - `combinators`: `Zip`, `Filtered` and `Catch` (default)
//! - `fxhash`: hash the mode histogram with `rustc-hash`
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use lambars_optics::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Order { lines: Vec<Line> }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Line { quantity: u32 }
//!
//! let quantities = lens!(Order, lines)
//!     .compose(VecTraversal::<Line>::new())
//!     .compose(lens!(Line, quantity));
//!
//! let order = Order { lines: vec![Line { quantity: 1 }, Line { quantity: 2 }] };
//! let context = Context::background();
//!
//! assert_eq!(quantities.foci(&context, &order).unwrap(), vec![1, 2]);
//! let doubled = quantities.modify(&context, order, &mut |_, quantity| Ok(quantity * 2)).unwrap();
//! assert_eq!(doubled.lines[1].quantity, 4);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the optic traits, the leaf optics, the composition functions
/// and the optic-building macros.
///
/// # Usage
///
/// ```rust
/// use lambars_optics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compose::{compose, compose_both, compose_left, compose_with};
    pub use crate::context::{CancelHandle, Context};
    pub use crate::error::{OpticError, OpticResult};
    pub use crate::identity::Identity;
    pub use crate::leaf::{
        FunctionIso, FunctionLens, FunctionPrism, MapTraversal, OptionTraversal, VecTraversal,
    };
    pub use crate::optic::{FocusRecord, Getter, Modifier, Optic, ReverseGetter};
    pub use crate::sequence::{Flow, Sequence};
    pub use crate::{iso, lens, prism};
}

pub mod capability;
pub mod compose;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod identity;
pub mod index;
pub mod leaf;
pub mod optic;
pub mod sequence;

#[cfg(feature = "combinators")]
pub mod combinators;

#[cfg(feature = "fold")]
pub mod fold;

pub use compose::{Composed, compose, compose_both, compose_left, compose_with};
pub use context::{CancelHandle, Context};
pub use error::{Cancellation, ErrorKind, OpticError, OpticResult, SequenceViolation};
pub use identity::Identity;
pub use optic::{FocusRecord, Getter, Modifier, Optic, Record, ReverseGetter};
