//! Isomorphisms built from a pair of inverse functions.
//!
//! # Laws
//!
//! 1. **GetReverseGet**: `reverse_get(get(s)) == s`
//! 2. **ReverseGetGet**: `get(reverse_get(a)) == a`

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use crate::capability::{Bi, One, Pure, ReadWrite};
use crate::context::Context;
use crate::diagnostics::Description;
use crate::error::OpticResult;
use crate::optic::{FocusRecord, Getter, MapFn, Modifier, Optic, Record, ReverseGetter, kind};
use crate::sequence::{Flow, Sink};

/// An iso from a forward and a backward function.
///
/// Reads clone the source before converting it.
///
/// # Examples
///
/// ```
/// use lambars_optics::prelude::*;
///
/// let chars = FunctionIso::new(
///     |text: String| text.chars().collect::<Vec<_>>(),
///     |chars: Vec<char>| chars.into_iter().collect::<String>(),
/// );
/// let context = Context::background();
///
/// assert_eq!(chars.get(&context, &"hi".to_string()).unwrap().focus, vec!['h', 'i']);
/// assert_eq!(chars.reverse_get(&context, vec!['o', 'k']).unwrap(), "ok");
/// ```
pub struct FunctionIso<S, A, G, Rg> {
    get_function: G,
    reverse_get_function: Rg,
    name: Cow<'static, str>,
    _marker: PhantomData<fn(S, A) -> (S, A)>,
}

impl<S, A, G, Rg> FunctionIso<S, A, G, Rg>
where
    G: Fn(S) -> A,
    Rg: Fn(A) -> S,
{
    /// Creates an iso from `get` and its inverse `reverse_get`.
    pub const fn new(get: G, reverse_get: Rg) -> Self {
        Self {
            get_function: get,
            reverse_get_function: reverse_get,
            name: Cow::Borrowed("Iso"),
            _marker: PhantomData,
        }
    }

    /// Sets the name used in failure traces.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// The inverse iso.
    #[must_use]
    pub fn reverse(self) -> FunctionIso<A, S, Rg, G> {
        FunctionIso {
            get_function: self.reverse_get_function,
            reverse_get_function: self.get_function,
            name: Cow::Owned(format!("Reverse({})", self.name)),
            _marker: PhantomData,
        }
    }
}

impl<S, A, G: Clone, Rg: Clone> Clone for FunctionIso<S, A, G, Rg> {
    fn clone(&self) -> Self {
        Self {
            get_function: self.get_function.clone(),
            reverse_get_function: self.reverse_get_function.clone(),
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S, A, G, Rg> fmt::Debug for FunctionIso<S, A, G, Rg> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FunctionIso")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<S, A, G, Rg> Optic for FunctionIso<S, A, G, Rg>
where
    S: Clone,
    G: Fn(S) -> A,
    Rg: Fn(A) -> S,
{
    type Index = ();
    type Source = S;
    type Target = S;
    type Focus = A;
    type Replacement = A;
    type Cardinality = One;
    type Mutability = ReadWrite;
    type Direction = Bi;
    type Purity = Pure;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::leaf(self.name.clone())
    }

    fn iterate(&self, _context: &Context, source: &S, sink: &mut Sink<'_, Record<(), A>>) -> Flow {
        sink.push(Ok(FocusRecord::new((), (self.get_function)(source.clone()))))
    }

    fn length(&self, _context: &Context, _source: &S) -> OpticResult<usize> {
        Ok(1)
    }
}

impl<S, A, G, Rg> Getter for FunctionIso<S, A, G, Rg>
where
    S: Clone,
    G: Fn(S) -> A,
    Rg: Fn(A) -> S,
{
    fn get(&self, _context: &Context, source: &S) -> OpticResult<FocusRecord<(), A>> {
        Ok(FocusRecord::new((), (self.get_function)(source.clone())))
    }
}

impl<S, A, G, Rg> Modifier for FunctionIso<S, A, G, Rg>
where
    S: Clone,
    G: Fn(S) -> A,
    Rg: Fn(A) -> S,
{
    fn modify(&self, _context: &Context, source: S, function: &mut MapFn<'_, (), A, A>) -> OpticResult<S> {
        let replaced = function(&(), (self.get_function)(source))?;
        Ok((self.reverse_get_function)(replaced))
    }
}

impl<S, A, G, Rg> ReverseGetter for FunctionIso<S, A, G, Rg>
where
    S: Clone,
    G: Fn(S) -> A,
    Rg: Fn(A) -> S,
{
    fn reverse_get(&self, _context: &Context, focus: A) -> OpticResult<S> {
        Ok((self.reverse_get_function)(focus))
    }
}

/// Builds a [`FunctionIso`] from a function and its inverse.
///
/// # Examples
///
/// ```
/// use lambars_optics::prelude::*;
///
/// let swap = iso!(|(a, b): (i32, String)| (b, a), |(b, a): (String, i32)| (a, b));
/// let context = Context::background();
///
/// let pair = (42, "hello".to_string());
/// let swapped = swap.get(&context, &pair).unwrap().focus;
/// assert_eq!(swapped, ("hello".to_string(), 42));
/// assert_eq!(swap.reverse_get(&context, swapped).unwrap(), pair);
/// ```
#[macro_export]
macro_rules! iso {
    ($get:expr, $reverse_get:expr) => {
        $crate::leaf::FunctionIso::new($get, $reverse_get)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn celsius() -> FunctionIso<i32, i32, impl Fn(i32) -> i32, impl Fn(i32) -> i32> {
        FunctionIso::new(|kelvin: i32| kelvin - 273, |celsius: i32| celsius + 273).named("Celsius")
    }

    #[test]
    fn test_iso_round_trip() {
        let context = Context::background();
        let focus = celsius().get(&context, &300).unwrap().focus;
        assert_eq!(focus, 27);
        assert_eq!(celsius().reverse_get(&context, focus).unwrap(), 300);
    }

    #[test]
    fn test_iso_modify_goes_through_both_directions() {
        let updated = celsius()
            .modify(&Context::background(), 273, &mut |_, value| Ok(value + 10))
            .unwrap();
        assert_eq!(updated, 283);
    }

    #[test]
    fn test_reverse_swaps_directions() {
        let kelvin = celsius().reverse();
        let context = Context::background();
        assert_eq!(kelvin.get(&context, &0).unwrap().focus, 273);
        assert_eq!(kelvin.describe().to_string(), "Reverse(Celsius)");
    }
}
