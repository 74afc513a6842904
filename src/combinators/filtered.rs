//! Predicate filtering of foci.

use std::fmt;

use crate::capability::{Many, Uni};
use crate::compose::left_failure as operand_failure;
use crate::context::Context;
use crate::diagnostics::Description;
use crate::error::OpticResult;
use crate::optic::{MapFn, Modifier, Optic, Record, kind};
use crate::sequence::{Flow, Sink};

/// Keeps the foci of an optic whose `(index, focus)` satisfy a predicate.
///
/// Error records of the wrapped optic are always forwarded. `modify` maps
/// the kept foci and returns the rejected ones unchanged, so a filtered
/// traversal is only lawful when the map function preserves the predicate.
///
/// # Examples
///
/// ```
/// use lambars_optics::prelude::*;
/// use lambars_optics::combinators::filtered;
///
/// let evens = filtered(VecTraversal::<i32>::new(), |_, value| value % 2 == 0);
/// let context = Context::background();
///
/// assert_eq!(evens.foci(&context, &vec![1, 2, 3, 4]).unwrap(), vec![2, 4]);
/// let doubled = evens
///     .modify(&context, vec![1, 2, 3, 4], &mut |_, value| Ok(value * 10))
///     .unwrap();
/// assert_eq!(doubled, vec![1, 20, 3, 40]);
/// ```
#[derive(Clone, Copy)]
pub struct Filtered<O, P> {
    inner: O,
    predicate: P,
}

impl<O, P> Filtered<O, P>
where
    O: Optic,
    P: Fn(&O::Index, &O::Focus) -> bool,
{
    /// Wraps `inner`, keeping the foci accepted by `predicate`.
    pub const fn new(inner: O, predicate: P) -> Self {
        Self { inner, predicate }
    }
}

impl<O: fmt::Debug, P> fmt::Debug for Filtered<O, P> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Filtered")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<O, P> Optic for Filtered<O, P>
where
    O: Optic,
    P: Fn(&O::Index, &O::Focus) -> bool,
{
    type Index = O::Index;
    type Source = O::Source;
    type Target = O::Target;
    type Focus = O::Focus;
    type Replacement = O::Replacement;
    type Cardinality = Many;
    type Mutability = O::Mutability;
    type Direction = Uni;
    type Purity = O::Purity;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::combinator("Filtered", vec![self.inner.describe()])
    }

    fn iterate(
        &self,
        context: &Context,
        source: &O::Source,
        sink: &mut Sink<'_, Record<O::Index, O::Focus>>,
    ) -> Flow {
        sink.nest(
            |inner| self.inner.iterate(context, source, inner),
            |outer, record| self.forward(context, outer, record),
        )
    }

    fn indexed_get(
        &self,
        context: &Context,
        index: &O::Index,
        source: &O::Source,
        sink: &mut Sink<'_, Record<O::Index, O::Focus>>,
    ) -> Flow {
        sink.nest(
            |inner| self.inner.indexed_get(context, index, source, inner),
            |outer, record| self.forward(context, outer, record),
        )
    }
}

impl<O, P> Filtered<O, P>
where
    O: Optic,
    P: Fn(&O::Index, &O::Focus) -> bool,
{
    fn forward(
        &self,
        context: &Context,
        sink: &mut Sink<'_, Record<O::Index, O::Focus>>,
        record: Record<O::Index, O::Focus>,
    ) -> Flow {
        match record {
            Ok(found) if (self.predicate)(&found.index, &found.focus) => sink.push(Ok(found)),
            Ok(_) => Flow::Continue,
            Err(error) => sink.push(Err(operand_failure(context, &self.inner, error))),
        }
    }
}

impl<O, P, A> Modifier for Filtered<O, P>
where
    O: Modifier<Focus = A, Replacement = A>,
    P: Fn(&O::Index, &A) -> bool,
{
    fn modify(
        &self,
        context: &Context,
        source: O::Source,
        function: &mut MapFn<'_, O::Index, A, A>,
    ) -> OpticResult<O::Target> {
        self.inner
            .modify(context, source, &mut |index, focus| {
                if (self.predicate)(index, &focus) {
                    function(index, focus)
                } else {
                    Ok(focus)
                }
            })
            .map_err(|error| operand_failure(context, &self.inner, error))
    }
}
