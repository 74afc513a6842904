//! Capability tags carried by every optic.
//!
//! Each optic declares four independent capability dimensions as zero-sized
//! marker types:
//!
//! | Dimension    | Markers                   | Combination rule            |
//! |--------------|---------------------------|-----------------------------|
//! | Cardinality  | [`One`], [`Many`]         | `Many` if either side `Many`  |
//! | Mutability   | [`ReadWrite`], [`ReadOnly`] | `ReadOnly` if either side is  |
//! | Direction    | [`Bi`], [`Uni`]           | `Uni` if either side `Uni`    |
//! | Purity       | [`Pure`], [`Fallible`]    | `Fallible` if either side is  |
//!
//! The combination rule is expressed through the `Join` generic associated
//! type, so a composed optic's tags are computed by the type checker and
//! never exist at runtime.
//!
//! # Examples
//!
//! ```
//! use lambars_optics::capability::{Cardinality, Many, One, Purity, Fallible, Pure};
//!
//! type Composed = <One as Cardinality>::Join<Many>;
//! assert!(<Composed as Cardinality>::IS_MANY);
//!
//! type Effect = <Pure as Purity>::Join<Fallible>;
//! assert!(!<Effect as Purity>::IS_PURE);
//! ```

use std::fmt;

use crate::optic::Optic;

mod sealed {
    pub trait Sealed {}
}

/// Exactly one focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct One;

/// Zero or more foci.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Many;

/// Foci can be read but not replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReadOnly;

/// Foci can be read and replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReadWrite;

/// The source can only be navigated forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Uni;

/// The source can be rebuilt from a focus alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bi;

/// The optic never reports an error of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pure;

/// The optic may report errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fallible;

impl sealed::Sealed for One {}
impl sealed::Sealed for Many {}
impl sealed::Sealed for ReadOnly {}
impl sealed::Sealed for ReadWrite {}
impl sealed::Sealed for Uni {}
impl sealed::Sealed for Bi {}
impl sealed::Sealed for Pure {}
impl sealed::Sealed for Fallible {}

/// Cardinality dimension: how many foci an optic addresses.
pub trait Cardinality: sealed::Sealed + Copy + Default + 'static {
    /// `true` for [`Many`].
    const IS_MANY: bool;

    /// Cardinality of `Self ∘ Other`.
    type Join<Other: Cardinality>: Cardinality;
}

impl Cardinality for One {
    const IS_MANY: bool = false;
    type Join<Other: Cardinality> = Other;
}

impl Cardinality for Many {
    const IS_MANY: bool = true;
    type Join<Other: Cardinality> = Many;
}

/// Mutability dimension: whether foci can be replaced.
pub trait Mutability: sealed::Sealed + Copy + Default + 'static {
    /// `true` for [`ReadOnly`].
    const IS_READ_ONLY: bool;

    /// Mutability of `Self ∘ Other`.
    type Join<Other: Mutability>: Mutability;
}

impl Mutability for ReadWrite {
    const IS_READ_ONLY: bool = false;
    type Join<Other: Mutability> = Other;
}

impl Mutability for ReadOnly {
    const IS_READ_ONLY: bool = true;
    type Join<Other: Mutability> = ReadOnly;
}

/// Direction dimension: whether the source can be rebuilt from a focus.
pub trait Direction: sealed::Sealed + Copy + Default + 'static {
    /// `true` for [`Bi`].
    const IS_BIDIRECTIONAL: bool;

    /// Direction of `Self ∘ Other`.
    type Join<Other: Direction>: Direction;
}

impl Direction for Bi {
    const IS_BIDIRECTIONAL: bool = true;
    type Join<Other: Direction> = Other;
}

impl Direction for Uni {
    const IS_BIDIRECTIONAL: bool = false;
    type Join<Other: Direction> = Uni;
}

/// Purity dimension: whether the optic can fail on its own.
pub trait Purity: sealed::Sealed + Copy + Default + 'static {
    /// `true` for [`Pure`].
    const IS_PURE: bool;

    /// Purity of `Self ∘ Other`.
    type Join<Other: Purity>: Purity;
}

impl Purity for Pure {
    const IS_PURE: bool = true;
    type Join<Other: Purity> = Other;
}

impl Purity for Fallible {
    const IS_PURE: bool = false;
    type Join<Other: Purity> = Fallible;
}

/// A runtime snapshot of an optic's four capability tags.
///
/// # Examples
///
/// ```
/// use lambars_optics::capability::Capabilities;
/// use lambars_optics::leaf::VecTraversal;
///
/// let capabilities = Capabilities::of::<VecTraversal<i32>>();
/// assert!(capabilities.many);
/// assert_eq!(capabilities.to_string(), "Many/ReadWrite/Uni/Pure");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// Whether the optic may address more than one focus.
    pub many: bool,
    /// Whether `modify` is unavailable.
    pub read_only: bool,
    /// Whether `reverse_get` is available.
    pub bidirectional: bool,
    /// Whether the optic never reports an error of its own.
    pub pure: bool,
}

impl Capabilities {
    /// Reads the capability tags of optic type `O`.
    #[must_use]
    pub const fn of<O: Optic>() -> Self {
        Self {
            many: <O::Cardinality as Cardinality>::IS_MANY,
            read_only: <O::Mutability as Mutability>::IS_READ_ONLY,
            bidirectional: <O::Direction as Direction>::IS_BIDIRECTIONAL,
            pure: <O::Purity as Purity>::IS_PURE,
        }
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}/{}/{}/{}",
            if self.many { "Many" } else { "One" },
            if self.read_only {
                "ReadOnly"
            } else {
                "ReadWrite"
            },
            if self.bidirectional { "Bi" } else { "Uni" },
            if self.pure { "Pure" } else { "Fallible" },
        )
    }
}

static_assertions::assert_eq_size!(One, Many, ReadOnly, ReadWrite, Uni, Bi, Pure, Fallible, ());

#[cfg(test)]
mod tests {
    use super::*;

    fn joined_many<A: Cardinality, B: Cardinality>() -> bool {
        <A::Join<B> as Cardinality>::IS_MANY
    }

    #[test]
    fn test_cardinality_join_table() {
        assert!(!joined_many::<One, One>());
        assert!(joined_many::<One, Many>());
        assert!(joined_many::<Many, One>());
        assert!(joined_many::<Many, Many>());
    }

    #[test]
    fn test_mutability_join_is_read_only_if_either_side_is() {
        assert!(!<<ReadWrite as Mutability>::Join<ReadWrite> as Mutability>::IS_READ_ONLY);
        assert!(<<ReadWrite as Mutability>::Join<ReadOnly> as Mutability>::IS_READ_ONLY);
        assert!(<<ReadOnly as Mutability>::Join<ReadWrite> as Mutability>::IS_READ_ONLY);
    }

    #[test]
    fn test_direction_join_is_uni_if_either_side_is() {
        assert!(<<Bi as Direction>::Join<Bi> as Direction>::IS_BIDIRECTIONAL);
        assert!(!<<Bi as Direction>::Join<Uni> as Direction>::IS_BIDIRECTIONAL);
        assert!(!<<Uni as Direction>::Join<Bi> as Direction>::IS_BIDIRECTIONAL);
    }

    #[test]
    fn test_purity_join_is_fallible_if_either_side_is() {
        assert!(<<Pure as Purity>::Join<Pure> as Purity>::IS_PURE);
        assert!(!<<Pure as Purity>::Join<Fallible> as Purity>::IS_PURE);
        assert!(!<<Fallible as Purity>::Join<Pure> as Purity>::IS_PURE);
    }

    #[test]
    fn test_capabilities_display() {
        let capabilities = Capabilities {
            many: false,
            read_only: true,
            bidirectional: false,
            pure: false,
        };
        assert_eq!(capabilities.to_string(), "One/ReadOnly/Uni/Fallible");
    }
}
