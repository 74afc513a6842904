//! Numeric types usable by the arithmetic reducers.

use std::cmp::Ordering;
use std::ops::Div;

/// A number with its own identities, sentinels and total order.
///
/// Integer accumulation saturates instead of overflowing. Floats are
/// ordered by [`f64::total_cmp`], so `NaN` sorts above infinity.
pub trait Numeric: Copy + PartialEq + Div<Output = Self> + 'static {
    /// The additive identity.
    const ZERO: Self;
    /// The multiplicative identity.
    const ONE: Self;
    /// A value no other value is below.
    const MIN_SENTINEL: Self;
    /// A value no other value is above.
    const MAX_SENTINEL: Self;

    /// Converts a focus count, saturating at the type's maximum.
    fn from_count(count: usize) -> Self;

    /// Total order over every value of the type.
    fn total_order(&self, other: &Self) -> Ordering;

    /// Sum of `self` and `other`.
    #[must_use]
    fn accumulate(self, other: Self) -> Self;

    /// Product of `self` and `other`.
    #[must_use]
    fn scale(self, other: Self) -> Self;

    /// The value halfway between `self` and `other`, rounded towards zero
    /// for integers.
    #[must_use]
    fn halfway(self, other: Self) -> Self;
}

macro_rules! integer_numeric {
    ($($integer:ty),+ $(,)?) => {
        $(
            impl Numeric for $integer {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MIN_SENTINEL: Self = <$integer>::MIN;
                const MAX_SENTINEL: Self = <$integer>::MAX;

                fn from_count(count: usize) -> Self {
                    Self::try_from(count).unwrap_or(<$integer>::MAX)
                }

                fn total_order(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }

                fn accumulate(self, other: Self) -> Self {
                    self.saturating_add(other)
                }

                fn scale(self, other: Self) -> Self {
                    self.saturating_mul(other)
                }

                fn halfway(self, other: Self) -> Self {
                    self.midpoint(other)
                }
            }
        )+
    };
}

macro_rules! float_numeric {
    ($($float:ty),+ $(,)?) => {
        $(
            impl Numeric for $float {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;
                const MIN_SENTINEL: Self = <$float>::NEG_INFINITY;
                const MAX_SENTINEL: Self = <$float>::INFINITY;

                #[allow(clippy::cast_precision_loss)]
                fn from_count(count: usize) -> Self {
                    count as Self
                }

                fn total_order(&self, other: &Self) -> Ordering {
                    self.total_cmp(other)
                }

                fn accumulate(self, other: Self) -> Self {
                    self + other
                }

                fn scale(self, other: Self) -> Self {
                    self * other
                }

                fn halfway(self, other: Self) -> Self {
                    self.midpoint(other)
                }
            }
        )+
    };
}

integer_numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
float_numeric!(f32, f64);

/// Orders a [`Numeric`] by [`Numeric::total_order`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ranked<N>(pub(crate) N);

impl<N: Numeric> PartialEq for Ranked<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: Numeric> Eq for Ranked<N> {}

impl<N: Numeric> PartialOrd for Ranked<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Numeric> Ord for Ranked<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_order(&other.0)
    }
}
