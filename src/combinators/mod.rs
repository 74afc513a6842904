//! Combinators built on the composition engine.
//!
//! - [`Zip`] pairs the foci of two optics over the same source by position.
//! - [`Filtered`] keeps the foci that satisfy a predicate.
//! - [`Catch`] swallows the error records a handler accepts.
//!
//! Combinators are transparent in failure traces: an error from an operand
//! is tagged with the operand's leaves, never with the combinator itself.

mod catch;
mod filtered;
mod zip;

pub use catch::Catch;
pub use filtered::Filtered;
pub use zip::Zip;

use crate::error::OpticError;
use crate::optic::Optic;

/// Pairs the foci of `left` and `right` by position. See [`Zip`].
pub fn zip<L, R>(left: L, right: R) -> Zip<L, R>
where
    L: Optic,
    R: Optic<Source = L::Source>,
{
    Zip::new(left, right)
}

/// Keeps the foci of `optic` for which `predicate(index, focus)` holds.
/// See [`Filtered`].
pub fn filtered<O, P>(optic: O, predicate: P) -> Filtered<O, P>
where
    O: Optic,
    P: Fn(&O::Index, &O::Focus) -> bool,
{
    Filtered::new(optic, predicate)
}

/// Drops the error records of `optic` that `handler` accepts. See [`Catch`].
pub fn catch<O, H>(optic: O, handler: H) -> Catch<O, H>
where
    O: Optic,
    H: Fn(&OpticError) -> bool,
{
    Catch::new(optic, handler)
}
