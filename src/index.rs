//! Index mappers: how a composition merges its operands' indices.
//!
//! When `L ∘ R` is built, every composed focus has a left index `I` (where
//! the intermediate focus sits in the source) and a right index `J` (where
//! the final focus sits in the intermediate). An [`IndexMapper`] merges the
//! pair into the composed optic's index.
//!
//! Mappers that can split a merged index back into its components let the
//! engine answer `indexed_get` by direct lookup on the operands instead of
//! scanning. [`BothIndex`] is fully invertible:
//!
//! ```
//! use lambars_optics::index::{BothIndex, IndexMapper};
//!
//! let merged = IndexMapper::<usize, char>::map(&BothIndex, &3, &'k').unwrap();
//! let split = IndexMapper::<usize, char>::unmap(&BothIndex, &merged);
//! assert_eq!((split.left, split.right), (Some(3), Some('k')));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use crate::error::{OpticError, OpticResult};

/// The components recovered from a merged index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unmapped<L, R> {
    /// The left operand's index, if recoverable.
    pub left: Option<L>,
    /// The right operand's index, if recoverable.
    pub right: Option<R>,
}

impl<L, R> Unmapped<L, R> {
    /// Nothing recoverable.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            left: None,
            right: None,
        }
    }
}

/// Merges the indices of a composition's operands.
pub trait IndexMapper<L, R> {
    /// The composed optic's index.
    type Mapped: Clone + PartialEq;

    /// Whether `unmap(map(l, r))` always recovers both components.
    const INVERTIBLE: bool = false;

    /// Merges a left and a right index.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapper cannot merge the pair.
    fn map(&self, left: &L, right: &R) -> OpticResult<Self::Mapped>;

    /// Splits a merged index into whatever components it can recover.
    fn unmap(&self, mapped: &Self::Mapped) -> Unmapped<L, R> {
        let _ = mapped;
        Unmapped::none()
    }

    /// Name used in `IndexMismatch` errors.
    fn describe(&self) -> Cow<'static, str>;

    /// Splits `mapped` into both components.
    ///
    /// # Errors
    ///
    /// Returns `IndexMismatch` naming the first missing component.
    fn recover(&self, mapped: &Self::Mapped) -> OpticResult<(L, R)> {
        match self.unmap(mapped) {
            Unmapped {
                left: Some(left),
                right: Some(right),
            } => Ok((left, right)),
            Unmapped { left: None, .. } => Err(OpticError::index_mismatch(self.describe(), "left")),
            Unmapped { right: None, .. } => {
                Err(OpticError::index_mismatch(self.describe(), "right"))
            }
        }
    }
}

/// Keeps the right operand's index. The default for composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RightIndex;

impl<L, R: Clone + PartialEq> IndexMapper<L, R> for RightIndex {
    type Mapped = R;

    fn map(&self, _left: &L, right: &R) -> OpticResult<R> {
        Ok(right.clone())
    }

    fn unmap(&self, mapped: &R) -> Unmapped<L, R> {
        Unmapped {
            left: None,
            right: Some(mapped.clone()),
        }
    }

    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed("RightIndex")
    }
}

/// Keeps the left operand's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LeftIndex;

impl<L: Clone + PartialEq, R> IndexMapper<L, R> for LeftIndex {
    type Mapped = L;

    fn map(&self, left: &L, _right: &R) -> OpticResult<L> {
        Ok(left.clone())
    }

    fn unmap(&self, mapped: &L) -> Unmapped<L, R> {
        Unmapped {
            left: Some(mapped.clone()),
            right: None,
        }
    }

    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed("LeftIndex")
    }
}

/// Pairs both indices. Invertible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BothIndex;

impl<L: Clone + PartialEq, R: Clone + PartialEq> IndexMapper<L, R> for BothIndex {
    type Mapped = (L, R);

    const INVERTIBLE: bool = true;

    fn map(&self, left: &L, right: &R) -> OpticResult<(L, R)> {
        Ok((left.clone(), right.clone()))
    }

    fn unmap(&self, mapped: &(L, R)) -> Unmapped<L, R> {
        Unmapped {
            left: Some(mapped.0.clone()),
            right: Some(mapped.1.clone()),
        }
    }

    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed("BothIndex")
    }
}

/// A mapper built from a merge function. Not invertible.
///
/// # Examples
///
/// ```
/// use lambars_optics::OpticResult;
/// use lambars_optics::index::{FunctionIndexMapper, IndexMapper};
///
/// let flat = FunctionIndexMapper::new(|row: &usize, column: &usize| -> OpticResult<usize> {
///     Ok(row * 10 + column)
/// });
/// assert_eq!(IndexMapper::<usize, usize>::map(&flat, &2, &3).unwrap(), 23);
/// ```
pub struct FunctionIndexMapper<K, F> {
    function: F,
    name: Cow<'static, str>,
    _marker: PhantomData<fn() -> K>,
}

impl<K, F> FunctionIndexMapper<K, F> {
    /// Wraps `function`.
    pub const fn new(function: F) -> Self {
        Self {
            function,
            name: Cow::Borrowed("FunctionIndex"),
            _marker: PhantomData,
        }
    }

    /// Sets the name reported in diagnostics.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<K, F: Clone> Clone for FunctionIndexMapper<K, F> {
    fn clone(&self) -> Self {
        Self {
            function: self.function.clone(),
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<K, F> fmt::Debug for FunctionIndexMapper<K, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FunctionIndexMapper")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<L, R, K, F> IndexMapper<L, R> for FunctionIndexMapper<K, F>
where
    K: Clone + PartialEq,
    F: Fn(&L, &R) -> OpticResult<K>,
{
    type Mapped = K;

    fn map(&self, left: &L, right: &R) -> OpticResult<K> {
        (self.function)(left, right)
    }

    fn describe(&self) -> Cow<'static, str> {
        self.name.clone()
    }
}
