//! The identity optic.
//!
//! [`Identity`] focuses on the whole source. It is zero-sized and is the
//! only optic whose kind is [`kind::Identity`], so composing with it never
//! allocates a wrapper (see [`crate::compose`]).

use std::fmt;
use std::marker::PhantomData;

use crate::capability::{Bi, One, Pure, ReadWrite};
use crate::context::Context;
use crate::diagnostics::Description;
use crate::error::OpticResult;
use crate::optic::{FocusRecord, Getter, MapFn, Modifier, Optic, Record, ReverseGetter, kind};
use crate::sequence::{Flow, Sink};

/// Focuses on the whole source, at the unit index.
///
/// # Examples
///
/// ```
/// use lambars_optics::prelude::*;
///
/// let context = Context::background();
/// let identity = Identity::<i32>::new();
///
/// assert_eq!(identity.get(&context, &7).unwrap().focus, 7);
/// assert_eq!(identity.reverse_get(&context, 8).unwrap(), 8);
/// ```
pub struct Identity<S> {
    _marker: PhantomData<fn(S) -> S>,
}

impl<S> Identity<S> {
    /// Creates the identity optic.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<S> Default for Identity<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for Identity<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Identity<S> {}

impl<S> fmt::Debug for Identity<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Identity")
    }
}

impl<S: Clone> Optic for Identity<S> {
    type Index = ();
    type Source = S;
    type Target = S;
    type Focus = S;
    type Replacement = S;
    type Cardinality = One;
    type Mutability = ReadWrite;
    type Direction = Bi;
    type Purity = Pure;
    type Kind = kind::Identity;

    fn describe(&self) -> Description {
        Description::Identity
    }

    fn iterate(&self, _context: &Context, source: &S, sink: &mut Sink<'_, Record<(), S>>) -> Flow {
        sink.push(Ok(FocusRecord::new((), source.clone())))
    }

    fn length(&self, _context: &Context, _source: &S) -> OpticResult<usize> {
        Ok(1)
    }
}

impl<S: Clone> Getter for Identity<S> {
    fn get(&self, _context: &Context, source: &S) -> OpticResult<FocusRecord<(), S>> {
        Ok(FocusRecord::new((), source.clone()))
    }
}

impl<S: Clone> Modifier for Identity<S> {
    fn modify(&self, _context: &Context, source: S, function: &mut MapFn<'_, (), S, S>) -> OpticResult<S> {
        function(&(), source)
    }
}

impl<S: Clone> ReverseGetter for Identity<S> {
    fn reverse_get(&self, _context: &Context, focus: S) -> OpticResult<S> {
        Ok(focus)
    }
}

static_assertions::assert_eq_size!(Identity<Vec<u8>>, ());
static_assertions::assert_impl_all!(Identity<String>: Send, Sync, Copy);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_modify_applies_once() {
        let mut calls = 0;
        let result = Identity::<String>::new().modify(
            &Context::background(),
            "a".to_string(),
            &mut |_, value| {
                calls += 1;
                Ok(value + "b")
            },
        );
        assert_eq!(result.unwrap(), "ab");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_identity_length_is_one() {
        assert_eq!(Identity::<u8>::new().length(&Context::background(), &0).unwrap(), 1);
    }
}
