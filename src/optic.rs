//! The optic primitive contract.
//!
//! Every optic implements [`Optic`], which provides the operations valid for
//! any capability combination: `iterate`, `indexed_get` and `length`. The
//! remaining primitives live on separate traits so that calling them on an
//! optic without the matching capability is a compile error:
//!
//! | Trait             | Operation       | Requires              |
//! |-------------------|-----------------|-----------------------|
//! | [`Getter`]        | `get`           | `Cardinality = One`   |
//! | [`Modifier`]      | `modify`, `set` | `Mutability = ReadWrite` |
//! | [`ReverseGetter`] | `reverse_get`   | `Direction = Bi`      |
//!
//! Foci are produced as owned values; leaves clone what they read out of the
//! borrowed source.
//!
//! # Examples
//!
//! ```
//! use lambars_optics::prelude::*;
//!
//! let traversal = VecTraversal::<i32>::new();
//! let context = Context::background();
//!
//! let foci = traversal.foci(&context, &vec![1, 2, 3]).unwrap();
//! assert_eq!(foci, vec![1, 2, 3]);
//!
//! let doubled = traversal
//!     .modify(&context, vec![1, 2, 3], &mut |_, value| Ok(value * 2))
//!     .unwrap();
//! assert_eq!(doubled, vec![2, 4, 6]);
//! ```

use crate::capability::{Cardinality, Direction, Mutability, Purity};
use crate::compose::{Composed, Elision};
use crate::context::Context;
use crate::diagnostics::Description;
use crate::error::{OpticError, OpticResult};
use crate::index::{BothIndex, IndexMapper, LeftIndex};
use crate::sequence::{Flow, Sequence, Sink, try_drive};

/// Static optic kinds, used to elide identity optics during composition.
pub mod kind {
    mod sealed {
        pub trait Sealed {}
    }

    /// The optic is the identity and can be dropped from a composition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Identity;

    /// Any other optic.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Regular;

    impl sealed::Sealed for Identity {}
    impl sealed::Sealed for Regular {}

    /// Kind marker valid for optic type `O`.
    ///
    /// Only [`crate::identity::Identity`] may declare the [`Identity`] kind.
    pub trait Kind<O: ?Sized>: sealed::Sealed + Copy + Default + 'static {}

    impl<S> Kind<crate::identity::Identity<S>> for Identity {}

    impl<O: ?Sized> Kind<O> for Regular {}
}

/// One element of an optic sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusRecord<I, A> {
    /// Index of the focus within its source.
    pub index: I,
    /// The focus itself.
    pub focus: A,
}

impl<I, A> FocusRecord<I, A> {
    /// Creates a record.
    pub const fn new(index: I, focus: A) -> Self {
        Self { index, focus }
    }

    /// Transforms the focus, keeping the index.
    pub fn map_focus<B>(self, function: impl FnOnce(A) -> B) -> FocusRecord<I, B> {
        FocusRecord {
            index: self.index,
            focus: function(self.focus),
        }
    }
}

/// A sequence element: a focus record or the error raised producing it.
pub type Record<I, A> = Result<FocusRecord<I, A>, OpticError>;

/// The base optic trait.
///
/// `Source` is the structure read from, `Target` the structure `modify`
/// rebuilds, `Focus` the value read out and `Replacement` the value written
/// back. The four capability tags describe which primitive traits the optic
/// implements.
pub trait Optic {
    /// Index identifying a focus within the source.
    type Index: Clone + PartialEq;
    /// The structure read from.
    type Source;
    /// The structure produced by `modify` and `reverse_get`.
    type Target;
    /// The value read out.
    type Focus;
    /// The value written back.
    type Replacement;

    /// [`crate::capability::One`] or [`crate::capability::Many`].
    type Cardinality: Cardinality;
    /// [`crate::capability::ReadWrite`] or [`crate::capability::ReadOnly`].
    type Mutability: Mutability;
    /// [`crate::capability::Bi`] or [`crate::capability::Uni`].
    type Direction: Direction;
    /// [`crate::capability::Pure`] or [`crate::capability::Fallible`].
    type Purity: Purity;
    /// [`kind::Regular`] for everything but the identity optic.
    type Kind: kind::Kind<Self>;

    /// Symbolic description, used only for diagnostics.
    fn describe(&self) -> Description;

    /// Pushes every focus of `source` into `sink`.
    ///
    /// Returns [`Flow::Stop`] when the sequence was cut short, either by the
    /// consumer or by cancellation.
    fn iterate(
        &self,
        context: &Context,
        source: &Self::Source,
        sink: &mut Sink<'_, Record<Self::Index, Self::Focus>>,
    ) -> Flow;

    /// Whether two indices of this optic address the same focus.
    fn index_matches(&self, left: &Self::Index, right: &Self::Index) -> bool {
        left == right
    }

    /// Pushes the foci at `index` into `sink`.
    ///
    /// The default filters [`Optic::iterate`]; leaves with direct lookup
    /// override it. Error records are always forwarded.
    fn indexed_get(
        &self,
        context: &Context,
        index: &Self::Index,
        source: &Self::Source,
        sink: &mut Sink<'_, Record<Self::Index, Self::Focus>>,
    ) -> Flow {
        sink.nest(
            |inner| self.iterate(context, source, inner),
            |outer, record| match record {
                Ok(record) if !self.index_matches(&record.index, index) => Flow::Continue,
                record => outer.push(record),
            },
        )
    }

    /// Number of foci in `source`.
    ///
    /// # Errors
    ///
    /// Returns the first error record produced while counting.
    fn length(&self, context: &Context, source: &Self::Source) -> OpticResult<usize> {
        let mut count = 0;
        try_drive(
            |sink| self.iterate(context, source, sink),
            |record: Record<Self::Index, Self::Focus>| {
                record?;
                count += 1;
                Ok::<_, OpticError>(Flow::Continue)
            },
        )?;
        Ok(count)
    }

    /// Collects every focus record, failing on the first error record.
    ///
    /// # Errors
    ///
    /// Returns the first error record.
    fn collect(
        &self,
        context: &Context,
        source: &Self::Source,
    ) -> OpticResult<Vec<FocusRecord<Self::Index, Self::Focus>>> {
        let mut records = Vec::new();
        try_drive(
            |sink| self.iterate(context, source, sink),
            |record: Record<Self::Index, Self::Focus>| {
                records.push(record?);
                Ok::<_, OpticError>(Flow::Continue)
            },
        )?;
        Ok(records)
    }

    /// Collects every focus, dropping indices.
    ///
    /// # Errors
    ///
    /// Returns the first error record.
    fn foci(&self, context: &Context, source: &Self::Source) -> OpticResult<Vec<Self::Focus>> {
        Ok(self
            .collect(context, source)?
            .into_iter()
            .map(|record| record.focus)
            .collect())
    }

    /// The first focus record.
    ///
    /// # Errors
    ///
    /// Returns `EmptyGet` when `source` has no focus, or the first error
    /// record.
    fn first(
        &self,
        context: &Context,
        source: &Self::Source,
    ) -> OpticResult<FocusRecord<Self::Index, Self::Focus>> {
        let mut first = None;
        try_drive(
            |sink| self.iterate(context, source, sink),
            |record: Record<Self::Index, Self::Focus>| {
                first = Some(record?);
                Ok::<_, OpticError>(Flow::Stop)
            },
        )?;
        first.ok_or_else(OpticError::empty_get)
    }

    /// Binds this optic to a context and source as a [`Sequence`].
    fn sequence<'a>(
        &'a self,
        context: &'a Context,
        source: &'a Self::Source,
    ) -> OpticSequence<'a, Self>
    where
        Self: Sized,
    {
        OpticSequence {
            optic: self,
            context,
            source,
        }
    }

    /// Composes `self ∘ right`, keeping the right index.
    ///
    /// Identity operands are elided. See [`crate::compose::compose`].
    fn compose<R>(self, right: R) -> <(Self::Kind, R::Kind) as Elision<Self, R>>::Output
    where
        Self: Sized,
        R: Optic<Source = Self::Focus, Target = Self::Replacement>,
        (Self::Kind, R::Kind): Elision<Self, R>,
    {
        crate::compose::compose(self, right)
    }

    /// Composes `self ∘ right`, merging indices with `mapper`.
    fn compose_with<R, M>(self, right: R, mapper: M) -> Composed<Self, R, M>
    where
        Self: Sized,
        R: Optic<Source = Self::Focus, Target = Self::Replacement>,
        M: IndexMapper<Self::Index, R::Index>,
    {
        crate::compose::compose_with(self, right, mapper)
    }

    /// Composes `self ∘ right`, keeping the left index.
    fn compose_left<R>(self, right: R) -> Composed<Self, R, LeftIndex>
    where
        Self: Sized,
        R: Optic<Source = Self::Focus, Target = Self::Replacement>,
    {
        crate::compose::compose_left(self, right)
    }

    /// Composes `self ∘ right`, pairing both indices.
    fn compose_both<R>(self, right: R) -> Composed<Self, R, BothIndex>
    where
        Self: Sized,
        R: Optic<Source = Self::Focus, Target = Self::Replacement>,
    {
        crate::compose::compose_both(self, right)
    }
}

/// Single-focus read, available when `Cardinality = One`.
pub trait Getter: Optic {
    /// Reads the one focus of `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the optic (or an operand of a composition) fails.
    fn get(
        &self,
        context: &Context,
        source: &Self::Source,
    ) -> OpticResult<FocusRecord<Self::Index, Self::Focus>>;
}

/// The map function handed to [`Modifier::modify`].
pub type MapFn<'f, I, A, B> = dyn FnMut(&I, A) -> OpticResult<B> + 'f;

/// Focus replacement, available when `Mutability = ReadWrite`.
pub trait Modifier: Optic {
    /// Rebuilds `source`, replacing every focus with `function(index, focus)`.
    ///
    /// Fails fast: the first error from `function` (or from an operand)
    /// aborts the rebuild.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by `function` or the optic.
    fn modify(
        &self,
        context: &Context,
        source: Self::Source,
        function: &mut MapFn<'_, Self::Index, Self::Focus, Self::Replacement>,
    ) -> OpticResult<Self::Target>;

    /// Replaces every focus with `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the optic fails.
    fn set(
        &self,
        context: &Context,
        source: Self::Source,
        value: Self::Replacement,
    ) -> OpticResult<Self::Target>
    where
        Self::Replacement: Clone,
    {
        self.modify(context, source, &mut |_, _| Ok(value.clone()))
    }
}

/// Source reconstruction, available when `Direction = Bi`.
pub trait ReverseGetter: Optic {
    /// Builds a target from a replacement focus alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the optic fails.
    fn reverse_get(&self, context: &Context, focus: Self::Replacement) -> OpticResult<Self::Target>;
}

/// An optic bound to a context and a source. See [`Optic::sequence`].
pub struct OpticSequence<'a, O: Optic> {
    optic: &'a O,
    context: &'a Context,
    source: &'a O::Source,
}

impl<O: Optic> Sequence for OpticSequence<'_, O> {
    type Item = Record<O::Index, O::Focus>;

    fn run(&self, sink: &mut Sink<'_, Self::Item>) -> Flow {
        self.optic.iterate(self.context, self.source, sink)
    }
}

impl<O: Optic> std::fmt::Debug for OpticSequence<'_, O> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("OpticSequence")
            .field("optic", &self.optic.describe())
            .finish_non_exhaustive()
    }
}
