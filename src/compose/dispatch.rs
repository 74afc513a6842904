//! Cardinality dispatch for composed optics.
//!
//! [`Dispatch`] is implemented for the four pairs of cardinality markers;
//! the compiler picks the implementation from `(L::Cardinality,
//! R::Cardinality)` when a [`Composed`] optic is used.
//!
//! | pair         | `iterate`                          | `indexed_get`                            | `length`                        |
//! |--------------|------------------------------------|------------------------------------------|---------------------------------|
//! | `One ∘ One`  | `L.get`, `R.get`; no sequence      | filter the single record                 | `1` when both are pure          |
//! | `One ∘ Many` | `L.get`, then `R.iterate`          | `R.indexed_get` when the right index is recoverable | `R.length` of the one focus |
//! | `Many ∘ One` | `L.iterate`, `R.get` per focus     | `L.indexed_get` when the left index is recoverable  | `L.length` when `R` is pure |
//! | `Many ∘ Many`| nested `L.iterate` / `R.iterate`   | both operands' `indexed_get` where recoverable      | sum of `R.length`           |
//!
//! Every lookup ends with a filter on the merged index, so a mapper that
//! recovers a component only narrows the scan, never changes the answer.
//! The context is checked once per left focus and once per record of a
//! `Many` right operand; a failed check pushes the cancellation error and
//! stops the sequence, so an unbounded operand on either side ends promptly.

use crate::capability::{Many, One, Purity};
use crate::context::Context;
use crate::error::{OpticError, OpticResult};
use crate::index::{IndexMapper, Unmapped};
use crate::optic::{FocusRecord, Getter, Optic, Record};
use crate::sequence::{Flow, Sink, try_drive};

use super::{Composed, check_hop, check_inner, left_failure, right_failure};

/// Assembles a composition's sequence primitives for one pair of operand
/// cardinalities.
pub trait Dispatch<L, R, M>
where
    L: Optic,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    /// [`Optic::iterate`] of the composition.
    fn iterate(
        composed: &Composed<L, R, M>,
        context: &Context,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow;

    /// [`Optic::indexed_get`] of the composition.
    fn indexed_get(
        composed: &Composed<L, R, M>,
        context: &Context,
        index: &M::Mapped,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow;

    /// [`Optic::length`] of the composition.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an operand.
    fn length(composed: &Composed<L, R, M>, context: &Context, source: &L::Source) -> OpticResult<usize>;
}

/// `get` through a composition of two single-focus optics.
pub(crate) fn get_through<L, R, M>(
    composed: &Composed<L, R, M>,
    context: &Context,
    source: &L::Source,
) -> OpticResult<FocusRecord<M::Mapped, R::Focus>>
where
    L: Getter,
    R: Getter<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    let outer = composed
        .left
        .get(context, source)
        .map_err(|error| left_failure(context, &composed.left, error))?;
    check_hop(context, &composed.left)?;
    let inner = composed.right.get(context, &outer.focus);
    merge(composed, context, &outer.index, inner)
}

/// Merges a right record under the left index that produced it.
fn merge<L, R, M>(
    composed: &Composed<L, R, M>,
    context: &Context,
    outer_index: &L::Index,
    record: Record<R::Index, R::Focus>,
) -> Record<M::Mapped, R::Focus>
where
    L: Optic,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    let fail = |error| right_failure(context, &composed.left, &composed.right, error);
    let inner = record.map_err(fail)?;
    let index = composed
        .mapper
        .map(outer_index, &inner.index)
        .map_err(fail)?;
    Ok(FocusRecord::new(index, inner.focus))
}

/// Forwards one record of the right operand under the left index.
///
/// A cancelled context ends the sequence: an error record is joined with
/// the cancellation, and a focus is replaced by the cancellation error.
fn forward<L, R, M>(
    composed: &Composed<L, R, M>,
    context: &Context,
    outer_index: &L::Index,
    record: Record<R::Index, R::Focus>,
    wanted: Option<&M::Mapped>,
    target: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
) -> Flow
where
    L: Optic,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    if let Err(cancelled) = check_inner(context, &composed.left, &composed.right) {
        let error = match record {
            Ok(_) => cancelled,
            Err(error) => right_failure(context, &composed.left, &composed.right, error),
        };
        return halt(target, error);
    }
    deliver(target, merge(composed, context, outer_index, record), wanted)
}

/// Pushes `record` unless it is a focus at an index other than `wanted`.
fn deliver<K: PartialEq, C>(
    sink: &mut Sink<'_, Record<K, C>>,
    record: Record<K, C>,
    wanted: Option<&K>,
) -> Flow {
    match (&record, wanted) {
        (Ok(found), Some(wanted)) if found.index != *wanted => Flow::Continue,
        _ => sink.push(record),
    }
}

/// Pushes a hop failure and ends the sequence.
fn halt<K, C>(sink: &mut Sink<'_, Record<K, C>>, error: OpticError) -> Flow {
    sink.push(Err(error));
    Flow::Stop
}

/// Splits a requested merged index into the components the mapper can
/// recover. Invertible mappers must recover both.
fn split<L, R, M>(mapper: &M, wanted: Option<&M::Mapped>) -> OpticResult<Unmapped<L, R>>
where
    M: IndexMapper<L, R>,
{
    match wanted {
        None => Ok(Unmapped::none()),
        Some(wanted) if M::INVERTIBLE => mapper.recover(wanted).map(|(left, right)| Unmapped {
            left: Some(left),
            right: Some(right),
        }),
        Some(wanted) => Ok(mapper.unmap(wanted)),
    }
}

fn count<K, C>(produce: impl FnOnce(&mut Sink<'_, Record<K, C>>) -> Flow) -> OpticResult<usize> {
    let mut total = 0;
    try_drive(produce, |record: Record<K, C>| {
        record?;
        total += 1;
        Ok::<_, OpticError>(Flow::Continue)
    })?;
    Ok(total)
}

impl<L, R, M> Dispatch<L, R, M> for (One, One)
where
    L: Getter,
    R: Getter<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    fn iterate(
        composed: &Composed<L, R, M>,
        context: &Context,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow {
        sink.push(get_through(composed, context, source))
    }

    fn indexed_get(
        composed: &Composed<L, R, M>,
        context: &Context,
        index: &M::Mapped,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow {
        deliver(sink, get_through(composed, context, source), Some(index))
    }

    fn length(composed: &Composed<L, R, M>, context: &Context, source: &L::Source) -> OpticResult<usize> {
        if <L::Purity as Purity>::IS_PURE && <R::Purity as Purity>::IS_PURE {
            check_hop(context, &composed.left)?;
            return Ok(1);
        }
        get_through(composed, context, source).map(|_| 1)
    }
}

fn one_many<L, R, M>(
    composed: &Composed<L, R, M>,
    context: &Context,
    wanted: Option<&M::Mapped>,
    source: &L::Source,
    sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
) -> Flow
where
    L: Getter,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    let outer = match composed.left.get(context, source) {
        Ok(outer) => outer,
        Err(error) => return sink.push(Err(left_failure(context, &composed.left, error))),
    };
    if let Err(error) = check_hop(context, &composed.left) {
        return halt(sink, error);
    }
    let parts = match split::<L::Index, R::Index, M>(&composed.mapper, wanted) {
        Ok(parts) => parts,
        Err(error) => return sink.push(Err(context.join_cancellation(error))),
    };
    if let Some(left) = &parts.left
        && !composed.left.index_matches(left, &outer.index)
    {
        return Flow::Continue;
    }
    sink.nest(
        |inner| match &parts.right {
            Some(right) => composed
                .right
                .indexed_get(context, right, &outer.focus, inner),
            None => composed.right.iterate(context, &outer.focus, inner),
        },
        |target, record| forward(composed, context, &outer.index, record, wanted, target),
    )
}

impl<L, R, M> Dispatch<L, R, M> for (One, Many)
where
    L: Getter,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    fn iterate(
        composed: &Composed<L, R, M>,
        context: &Context,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow {
        one_many(composed, context, None, source, sink)
    }

    fn indexed_get(
        composed: &Composed<L, R, M>,
        context: &Context,
        index: &M::Mapped,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow {
        one_many(composed, context, Some(index), source, sink)
    }

    fn length(composed: &Composed<L, R, M>, context: &Context, source: &L::Source) -> OpticResult<usize> {
        let outer = composed
            .left
            .get(context, source)
            .map_err(|error| left_failure(context, &composed.left, error))?;
        check_hop(context, &composed.left)?;
        composed
            .right
            .length(context, &outer.focus)
            .map_err(|error| right_failure(context, &composed.left, &composed.right, error))
    }
}

fn many_one<L, R, M>(
    composed: &Composed<L, R, M>,
    context: &Context,
    wanted: Option<&M::Mapped>,
    source: &L::Source,
    sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
) -> Flow
where
    L: Optic,
    R: Getter<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    let parts = match split::<L::Index, R::Index, M>(&composed.mapper, wanted) {
        Ok(parts) => parts,
        Err(error) => return sink.push(Err(context.join_cancellation(error))),
    };
    sink.nest(
        |inner| match &parts.left {
            Some(left) => composed.left.indexed_get(context, left, source, inner),
            None => composed.left.iterate(context, source, inner),
        },
        |target, record| {
            let outer = match record {
                Ok(outer) => outer,
                Err(error) => return target.push(Err(left_failure(context, &composed.left, error))),
            };
            if let Err(error) = check_hop(context, &composed.left) {
                return halt(target, error);
            }
            let inner = composed.right.get(context, &outer.focus);
            deliver(target, merge(composed, context, &outer.index, inner), wanted)
        },
    )
}

impl<L, R, M> Dispatch<L, R, M> for (Many, One)
where
    L: Optic,
    R: Getter<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    fn iterate(
        composed: &Composed<L, R, M>,
        context: &Context,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow {
        many_one(composed, context, None, source, sink)
    }

    fn indexed_get(
        composed: &Composed<L, R, M>,
        context: &Context,
        index: &M::Mapped,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow {
        many_one(composed, context, Some(index), source, sink)
    }

    fn length(composed: &Composed<L, R, M>, context: &Context, source: &L::Source) -> OpticResult<usize> {
        if <R::Purity as Purity>::IS_PURE {
            check_hop(context, &composed.left)?;
            return composed
                .left
                .length(context, source)
                .map_err(|error| left_failure(context, &composed.left, error));
        }
        count(|sink| many_one(composed, context, None, source, sink))
    }
}

fn many_many<L, R, M>(
    composed: &Composed<L, R, M>,
    context: &Context,
    wanted: Option<&M::Mapped>,
    source: &L::Source,
    sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
) -> Flow
where
    L: Optic,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    let parts = match split::<L::Index, R::Index, M>(&composed.mapper, wanted) {
        Ok(parts) => parts,
        Err(error) => return sink.push(Err(context.join_cancellation(error))),
    };
    sink.nest(
        |inner| match &parts.left {
            Some(left) => composed.left.indexed_get(context, left, source, inner),
            None => composed.left.iterate(context, source, inner),
        },
        |target, record| {
            let outer = match record {
                Ok(outer) => outer,
                Err(error) => return target.push(Err(left_failure(context, &composed.left, error))),
            };
            if let Err(error) = check_hop(context, &composed.left) {
                return halt(target, error);
            }
            target.nest(
                |inner| match &parts.right {
                    Some(right) => composed
                        .right
                        .indexed_get(context, right, &outer.focus, inner),
                    None => composed.right.iterate(context, &outer.focus, inner),
                },
                |target, record| forward(composed, context, &outer.index, record, wanted, target),
            )
        },
    )
}

impl<L, R, M> Dispatch<L, R, M> for (Many, Many)
where
    L: Optic,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    fn iterate(
        composed: &Composed<L, R, M>,
        context: &Context,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow {
        many_many(composed, context, None, source, sink)
    }

    fn indexed_get(
        composed: &Composed<L, R, M>,
        context: &Context,
        index: &M::Mapped,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow {
        many_many(composed, context, Some(index), source, sink)
    }

    fn length(composed: &Composed<L, R, M>, context: &Context, source: &L::Source) -> OpticResult<usize> {
        let mut total = 0;
        try_drive(
            |inner| composed.left.iterate(context, source, inner),
            |record: Record<L::Index, L::Focus>| {
                let outer = record.map_err(|error| left_failure(context, &composed.left, error))?;
                check_hop(context, &composed.left)?;
                total += composed
                    .right
                    .length(context, &outer.focus)
                    .map_err(|error| right_failure(context, &composed.left, &composed.right, error))?;
                Ok::<_, OpticError>(Flow::Continue)
            },
        )?;
        Ok(total)
    }
}
