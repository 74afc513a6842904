//! Error recovery over an optic's sequence.

use std::fmt;

use crate::capability::{Many, ReadOnly, Uni};
use crate::compose::left_failure as operand_failure;
use crate::context::Context;
use crate::diagnostics::{Description, render_trace};
use crate::error::OpticError;
use crate::optic::{Optic, Record, kind};
use crate::sequence::{Flow, Sink};

/// Drops the error records of an optic that a handler accepts.
///
/// Records the handler rejects are forwarded with their trace intact, so a
/// `Catch` never hides where an error it does not handle came from. The
/// result is read-only.
///
/// # Examples
///
/// ```
/// use lambars_optics::prelude::*;
/// use lambars_optics::combinators::catch;
/// use lambars_optics::OpticError;
///
/// let lenient = catch(VecTraversal::<u8>::new(), OpticError::is_empty_get);
/// let context = Context::background();
/// assert_eq!(lenient.foci(&context, &vec![1, 2]).unwrap(), vec![1, 2]);
/// ```
#[derive(Clone, Copy)]
pub struct Catch<O, H> {
    inner: O,
    handler: H,
}

impl<O, H> Catch<O, H>
where
    O: Optic,
    H: Fn(&OpticError) -> bool,
{
    /// Wraps `inner`, swallowing the errors `handler` returns `true` for.
    pub const fn new(inner: O, handler: H) -> Self {
        Self { inner, handler }
    }
}

impl<O: fmt::Debug, H> fmt::Debug for Catch<O, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Catch")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<O, H> Optic for Catch<O, H>
where
    O: Optic,
    H: Fn(&OpticError) -> bool,
{
    type Index = O::Index;
    type Source = O::Source;
    type Target = O::Target;
    type Focus = O::Focus;
    type Replacement = O::Replacement;
    type Cardinality = Many;
    type Mutability = ReadOnly;
    type Direction = Uni;
    type Purity = O::Purity;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::combinator("Catch", vec![self.inner.describe()])
    }

    fn iterate(
        &self,
        context: &Context,
        source: &O::Source,
        sink: &mut Sink<'_, Record<O::Index, O::Focus>>,
    ) -> Flow {
        sink.nest(
            |inner| self.inner.iterate(context, source, inner),
            |outer, record| match record {
                Ok(found) => outer.push(Ok(found)),
                Err(error) => {
                    let error = operand_failure(context, &self.inner, error);
                    if (self.handler)(&error) {
                        tracing::debug!(error = %render_trace(&error), "error record handled");
                        Flow::Continue
                    } else {
                        outer.push(Err(error))
                    }
                }
            },
        )
    }
}
