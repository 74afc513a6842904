//! Folding the foci of an optic through a reducer.
//!
//! A [`Reducer`] seeds a state, steps it once per focus and finishes it
//! into a result. [`reduce`] drives an optic's foci through a reducer and
//! stops at the first error, whether it comes from the optic, the reducer
//! or the context.
//!
//! Tuples of up to nine reducers are reducers themselves: every focus is
//! threaded through each component.
//!
//! # Examples
//!
//! ```
//! use lambars_optics::prelude::*;
//! use lambars_optics::fold::{reduce, Count, Max, Mean, Min};
//!
//! let context = Context::background();
//! let readings = vec![4.0, 8.0, 6.0];
//!
//! let (count, low, high, mean) =
//!     reduce(&VecTraversal::new(), &context, &readings, &(Count, Min, Max, Mean)).unwrap();
//! assert_eq!((count, low, high, mean), (3, 4.0, 8.0, 6.0));
//! ```

mod numeric;
mod reducer;
mod stats;

pub use numeric::Numeric;
pub use reducer::{Count, Extremum, First, FunctionReducer, Max, Mean, Min, Product, Sum};
pub use stats::{Median, MedianState, Mode, ModeState};

use crate::context::Context;
use crate::error::{OpticError, OpticResult};
use crate::optic::{Optic, Record};
use crate::sequence::{Flow, try_drive};

/// A fold over foci of type `A`.
pub trait Reducer<A> {
    /// The accumulator, owned by a single fold.
    type State;
    /// The folded result.
    type Output;

    /// The state before any focus has been seen.
    fn seed(&self) -> Self::State;

    /// Accounts for one focus.
    ///
    /// # Errors
    ///
    /// An error ends the fold.
    fn step(&self, state: &mut Self::State, focus: A) -> OpticResult<()>;

    /// Turns the final state into the result.
    ///
    /// # Errors
    ///
    /// Reducers that need at least one focus return `EmptyGet` for an
    /// empty fold.
    fn finish(&self, state: Self::State) -> OpticResult<Self::Output>;
}

impl<A, R: Reducer<A> + ?Sized> Reducer<A> for &R {
    type State = R::State;
    type Output = R::Output;

    fn seed(&self) -> R::State {
        (**self).seed()
    }

    fn step(&self, state: &mut R::State, focus: A) -> OpticResult<()> {
        (**self).step(state, focus)
    }

    fn finish(&self, state: R::State) -> OpticResult<R::Output> {
        (**self).finish(state)
    }
}

/// Folds the foci of `optic` in `source` through `reducer`.
///
/// The context is checked before every step.
///
/// # Errors
///
/// Returns the first error record of the optic, the first error of the
/// reducer, a cancellation observed between steps, or the error of
/// [`Reducer::finish`].
pub fn reduce<O, R>(optic: &O, context: &Context, source: &O::Source, reducer: &R) -> OpticResult<R::Output>
where
    O: Optic,
    R: Reducer<O::Focus>,
{
    let mut state = reducer.seed();
    try_drive(
        |sink| optic.iterate(context, source, sink),
        |record: Record<O::Index, O::Focus>| {
            let found = record?;
            context.check()?;
            reducer.step(&mut state, found.focus)?;
            Ok::<_, OpticError>(Flow::Continue)
        },
    )?;
    reducer.finish(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::{MapTraversal, VecTraversal};
    use std::cell::Cell;
    use std::collections::BTreeMap;

    #[test]
    fn test_reduce_sums_map_values() {
        let prices = BTreeMap::from([("tea", 3_u32), ("cake", 5)]);
        let total = reduce(&MapTraversal::new(), &Context::background(), &prices, &Sum).unwrap();
        assert_eq!(total, 8);
    }

    #[test]
    fn test_reduce_stops_at_reducer_error() {
        let steps = Cell::new(0);
        let failing = FunctionReducer::new((), |(), focus: i32| {
            steps.set(steps.get() + 1);
            if focus > 1 {
                Err(OpticError::user_message("too large"))
            } else {
                Ok(())
            }
        });
        let error = reduce(&VecTraversal::new(), &Context::background(), &vec![1, 2, 3], &failing).unwrap_err();
        assert!(error.is_user_error());
        assert_eq!(steps.get(), 2);
    }

    #[test]
    fn test_reduce_observes_cancelled_context() {
        let (context, handle) = Context::background().with_cancel();
        handle.cancel();
        let error = reduce(&VecTraversal::new(), &context, &vec![1, 2], &Count).unwrap_err();
        assert!(error.is_cancelled());
    }

    #[test]
    fn test_reduce_through_reference() {
        let context = Context::background();
        let median = &Median;
        assert_eq!(reduce(&VecTraversal::new(), &context, &vec![3, 1, 2], &median).unwrap(), 2);
    }
}
