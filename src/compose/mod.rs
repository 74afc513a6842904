//! Optic composition.
//!
//! `compose(l, r)` focuses through `l` and then through `r`. The result is a
//! [`Composed`] optic whose primitives are assembled from the operands':
//!
//! - capability tags are joined at the type level (see
//!   [`crate::capability`]), so `modify` only exists on the composition when
//!   both operands are read-write, `reverse_get` only when both are
//!   bidirectional, and `get` only when both have exactly one focus;
//! - `iterate`, `indexed_get` and `length` are dispatched on the operands'
//!   cardinalities to one of four specialized implementations (see
//!   [`dispatch`]);
//! - indices are merged by an [`IndexMapper`] ([`RightIndex`] unless chosen
//!   explicitly).
//!
//! # Identity elision
//!
//! Composing with [`Identity`] does not wrap anything: the identity operand
//! is dropped at compile time through the [`Elision`] table.
//!
//! | left     | right    | result                          |
//! |----------|----------|---------------------------------|
//! | identity | identity | the left identity               |
//! | identity | regular  | the right optic, unchanged      |
//! | regular  | identity | the left optic, [`Reindexed`] to `()` |
//! | regular  | regular  | [`Composed`] with [`RightIndex`] |
//!
//! Explicit-mapper compositions never elide.
//!
//! # Failure traces
//!
//! An error leaving a composition is tagged with the leaf it came from, and
//! with every leaf of the left operand when it came through the right one.
//! A failure at depth `N` of a chain therefore carries exactly `N` frames,
//! innermost first, however the chain was associated.
//!
//! # Examples
//!
//! ```
//! use lambars_optics::prelude::*;
//!
//! let plus_one = iso!(|value: i32| value + 1, |value: i32| value - 1);
//! let optic = VecTraversal::<i32>::new().compose(plus_one);
//! let context = Context::background();
//!
//! assert_eq!(optic.foci(&context, &vec![1, 2, 3]).unwrap(), vec![2, 3, 4]);
//! assert_eq!(optic.length(&context, &vec![1, 2, 3]).unwrap(), 3);
//!
//! let updated = optic
//!     .modify(&context, vec![1, 2, 3, 4], &mut |_, value| Ok(value + 1))
//!     .unwrap();
//! assert_eq!(updated, vec![2, 3, 4, 5]);
//! ```
//!
//! [`Identity`]: crate::identity::Identity

pub mod dispatch;

use std::fmt;

use crate::capability::{Cardinality, Direction, Mutability, Purity};
use crate::context::Context;
use crate::diagnostics::Description;
use crate::error::{OpticError, OpticResult};
use crate::index::{BothIndex, IndexMapper, LeftIndex, RightIndex};
use crate::optic::{
    FocusRecord, Getter, MapFn, Modifier, Optic, Record, ReverseGetter, kind,
};
use crate::sequence::{Flow, Sink};

pub use dispatch::Dispatch;

/// `left ∘ right` with indices merged by `mapper`.
///
/// Built by [`compose`], [`compose_with`], [`compose_left`] and
/// [`compose_both`]. Construction never fails and never touches data.
#[derive(Clone)]
pub struct Composed<L, R, M> {
    left: L,
    right: R,
    mapper: M,
}

impl<L, R, M> Composed<L, R, M> {
    /// The outer operand.
    pub const fn left(&self) -> &L {
        &self.left
    }

    /// The inner operand.
    pub const fn right(&self) -> &R {
        &self.right
    }

    /// The index mapper.
    pub const fn mapper(&self) -> &M {
        &self.mapper
    }

    /// Splits the composition into its parts.
    pub fn into_parts(self) -> (L, R, M) {
        (self.left, self.right, self.mapper)
    }
}

impl<L: Optic, R: Optic, M> fmt::Debug for Composed<L, R, M> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("Composed")
            .field(&Description::compose(
                self.left.describe(),
                self.right.describe(),
            ))
            .finish()
    }
}

/// Composes `left ∘ right` with the default [`RightIndex`] mapper, eliding
/// identity operands.
pub fn compose<L, R>(left: L, right: R) -> <(L::Kind, R::Kind) as Elision<L, R>>::Output
where
    L: Optic,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
    (L::Kind, R::Kind): Elision<L, R>,
{
    <(L::Kind, R::Kind) as Elision<L, R>>::elide(left, right)
}

/// Composes `left ∘ right`, merging indices with `mapper`. Never elides.
pub fn compose_with<L, R, M>(left: L, right: R, mapper: M) -> Composed<L, R, M>
where
    L: Optic,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
{
    if tracing::enabled!(tracing::Level::TRACE) {
        tracing::trace!(
            left = %left.describe(),
            right = %right.describe(),
            mapper = %mapper.describe(),
            "composing optics"
        );
    }
    Composed {
        left,
        right,
        mapper,
    }
}

/// Composes `left ∘ right`, keeping the left index.
pub fn compose_left<L, R>(left: L, right: R) -> Composed<L, R, LeftIndex>
where
    L: Optic,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
{
    compose_with(left, right, LeftIndex)
}

/// Composes `left ∘ right`, pairing both indices.
pub fn compose_both<L, R>(left: L, right: R) -> Composed<L, R, BothIndex>
where
    L: Optic,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
{
    compose_with(left, right, BothIndex)
}

/// Static identity-elision table, implemented for pairs of
/// [`kind`] markers.
pub trait Elision<L, R> {
    /// The optic `compose(left, right)` produces.
    type Output;

    /// Builds the composition.
    fn elide(left: L, right: R) -> Self::Output;
}

impl<L, R> Elision<L, R> for (kind::Identity, kind::Identity) {
    type Output = L;

    fn elide(left: L, _right: R) -> L {
        tracing::trace!("elided identity ∘ identity");
        left
    }
}

impl<L, R> Elision<L, R> for (kind::Identity, kind::Regular) {
    type Output = R;

    fn elide(_left: L, right: R) -> R {
        tracing::trace!("elided left identity");
        right
    }
}

impl<L, R> Elision<L, R> for (kind::Regular, kind::Identity) {
    type Output = Reindexed<L>;

    fn elide(left: L, _right: R) -> Reindexed<L> {
        tracing::trace!("elided right identity");
        Reindexed(left)
    }
}

impl<L, R> Elision<L, R> for (kind::Regular, kind::Regular)
where
    L: Optic,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
{
    type Output = Composed<L, R, RightIndex>;

    fn elide(left: L, right: R) -> Self::Output {
        compose_with(left, right, RightIndex)
    }
}

/// An optic relabeled to the unit index.
///
/// Produced when an optic is composed with a trailing identity; otherwise
/// behaves exactly like the wrapped optic.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Reindexed<O>(O);

impl<O> Reindexed<O> {
    /// Wraps `optic`.
    pub const fn new(optic: O) -> Self {
        Self(optic)
    }

    /// The wrapped optic.
    pub const fn inner(&self) -> &O {
        &self.0
    }

    /// Unwraps the optic.
    pub fn into_inner(self) -> O {
        self.0
    }
}

impl<O: Optic> Optic for Reindexed<O> {
    type Index = ();
    type Source = O::Source;
    type Target = O::Target;
    type Focus = O::Focus;
    type Replacement = O::Replacement;
    type Cardinality = O::Cardinality;
    type Mutability = O::Mutability;
    type Direction = O::Direction;
    type Purity = O::Purity;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        self.0.describe()
    }

    fn iterate(
        &self,
        context: &Context,
        source: &O::Source,
        sink: &mut Sink<'_, Record<(), O::Focus>>,
    ) -> Flow {
        sink.nest(
            |inner| self.0.iterate(context, source, inner),
            |outer, record| outer.push(record.map(|record| FocusRecord::new((), record.focus))),
        )
    }

    fn indexed_get(
        &self,
        context: &Context,
        _index: &(),
        source: &O::Source,
        sink: &mut Sink<'_, Record<(), O::Focus>>,
    ) -> Flow {
        self.iterate(context, source, sink)
    }

    fn length(&self, context: &Context, source: &O::Source) -> OpticResult<usize> {
        self.0.length(context, source)
    }
}

impl<O: Getter> Getter for Reindexed<O> {
    fn get(&self, context: &Context, source: &O::Source) -> OpticResult<FocusRecord<(), O::Focus>> {
        self.0
            .get(context, source)
            .map(|record| FocusRecord::new((), record.focus))
    }
}

impl<O: Modifier> Modifier for Reindexed<O> {
    fn modify(
        &self,
        context: &Context,
        source: O::Source,
        function: &mut MapFn<'_, (), O::Focus, O::Replacement>,
    ) -> OpticResult<O::Target> {
        self.0
            .modify(context, source, &mut |_, focus| function(&(), focus))
    }
}

impl<O: ReverseGetter> ReverseGetter for Reindexed<O> {
    fn reverse_get(&self, context: &Context, focus: O::Replacement) -> OpticResult<O::Target> {
        self.0.reverse_get(context, focus)
    }
}

impl<L, R, M> Optic for Composed<L, R, M>
where
    L: Optic,
    R: Optic<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
    (L::Cardinality, R::Cardinality): Dispatch<L, R, M>,
{
    type Index = M::Mapped;
    type Source = L::Source;
    type Target = L::Target;
    type Focus = R::Focus;
    type Replacement = R::Replacement;
    type Cardinality = <L::Cardinality as Cardinality>::Join<R::Cardinality>;
    type Mutability = <L::Mutability as Mutability>::Join<R::Mutability>;
    type Direction = <L::Direction as Direction>::Join<R::Direction>;
    type Purity = <L::Purity as Purity>::Join<R::Purity>;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::compose(self.left.describe(), self.right.describe())
    }

    fn iterate(
        &self,
        context: &Context,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow {
        <(L::Cardinality, R::Cardinality) as Dispatch<L, R, M>>::iterate(self, context, source, sink)
    }

    fn indexed_get(
        &self,
        context: &Context,
        index: &M::Mapped,
        source: &L::Source,
        sink: &mut Sink<'_, Record<M::Mapped, R::Focus>>,
    ) -> Flow {
        <(L::Cardinality, R::Cardinality) as Dispatch<L, R, M>>::indexed_get(
            self, context, index, source, sink,
        )
    }

    fn length(&self, context: &Context, source: &L::Source) -> OpticResult<usize> {
        <(L::Cardinality, R::Cardinality) as Dispatch<L, R, M>>::length(self, context, source)
    }
}

impl<L, R, M> Getter for Composed<L, R, M>
where
    L: Getter,
    R: Getter<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
    (L::Cardinality, R::Cardinality): Dispatch<L, R, M>,
{
    fn get(
        &self,
        context: &Context,
        source: &L::Source,
    ) -> OpticResult<FocusRecord<M::Mapped, R::Focus>> {
        dispatch::get_through(self, context, source)
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Hop,
    Right,
}

impl<L, R, M> Modifier for Composed<L, R, M>
where
    L: Modifier,
    R: Modifier<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
    (L::Cardinality, R::Cardinality): Dispatch<L, R, M>,
{
    fn modify(
        &self,
        context: &Context,
        source: L::Source,
        function: &mut MapFn<'_, M::Mapped, R::Focus, R::Replacement>,
    ) -> OpticResult<L::Target> {
        let mut failed = Side::Left;
        let result = self.left.modify(context, source, &mut |outer_index, intermediate| {
            if let Err(error) = check_hop(context, &self.left) {
                failed = Side::Hop;
                return Err(error);
            }
            self.right
                .modify(context, intermediate, &mut |inner_index, focus| {
                    context.check().inspect_err(|_| {
                        tracing::debug!(
                            within = %self.right.describe(),
                            "composition observed cancellation inside its right operand"
                        );
                    })?;
                    let merged = self.mapper.map(outer_index, inner_index)?;
                    function(&merged, focus)
                })
                .inspect_err(|_| failed = Side::Right)
        });
        result.map_err(|error| match failed {
            Side::Left => left_failure(context, &self.left, error),
            Side::Hop => context.join_cancellation(error),
            Side::Right => right_failure(context, &self.left, &self.right, error),
        })
    }
}

impl<L, R, M> ReverseGetter for Composed<L, R, M>
where
    L: ReverseGetter,
    R: ReverseGetter<Source = L::Focus, Target = L::Replacement>,
    M: IndexMapper<L::Index, R::Index>,
    (L::Cardinality, R::Cardinality): Dispatch<L, R, M>,
{
    fn reverse_get(&self, context: &Context, focus: R::Replacement) -> OpticResult<L::Target> {
        let intermediate = self
            .right
            .reverse_get(context, focus)
            .map_err(|error| right_failure(context, &self.left, &self.right, error))?;
        check_hop(context, &self.left)?;
        self.left
            .reverse_get(context, intermediate)
            .map_err(|error| left_failure(context, &self.left, error))
    }
}

/// Tags an error raised by the left operand.
pub(crate) fn left_failure<L: Optic>(context: &Context, left: &L, error: OpticError) -> OpticError {
    context.join_cancellation(error.originated_in(&left.describe()))
}

/// Tags an error raised by the right operand, or while merging its index.
pub(crate) fn right_failure<L: Optic, R: Optic>(
    context: &Context,
    left: &L,
    right: &R,
    error: OpticError,
) -> OpticError {
    context.join_cancellation(
        error
            .originated_in(&right.describe())
            .passed_through(&left.describe()),
    )
}

/// Checks the context at a composition boundary.
pub(crate) fn check_hop<L: Optic>(context: &Context, left: &L) -> OpticResult<()> {
    context.check().map_err(|error| {
        let path = left.describe();
        tracing::debug!(after = %path, "composition hop observed cancellation");
        error.passed_through(&path)
    })
}

/// Checks the context before forwarding a record of the right operand.
///
/// The error is tagged as if the right operand had raised it.
pub(crate) fn check_inner<L: Optic, R: Optic>(context: &Context, left: &L, right: &R) -> OpticResult<()> {
    context.check().map_err(|error| {
        let origin = right.describe();
        tracing::debug!(within = %origin, "composition observed cancellation inside its right operand");
        error.originated_in(&origin).passed_through(&left.describe())
    })
}
