//! Prisms built from a preview and a review function.
//!
//! A prism focuses on one case of a sum type: it has zero or one focus, and
//! can build the whole source from a focus alone.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use crate::capability::{Bi, Many, Pure, ReadWrite};
use crate::context::Context;
use crate::diagnostics::Description;
use crate::error::OpticResult;
use crate::optic::{FocusRecord, MapFn, Modifier, Optic, Record, ReverseGetter, kind};
use crate::sequence::{Flow, Sink};

/// A prism from a borrowing preview and a constructing review.
///
/// # Examples
///
/// ```
/// use lambars_optics::prelude::*;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Shape { Circle(f64), Square(f64) }
///
/// let circle = prism!(Shape, Circle);
/// let context = Context::background();
///
/// assert_eq!(circle.foci(&context, &Shape::Circle(1.5)).unwrap(), vec![1.5]);
/// assert!(circle.foci(&context, &Shape::Square(2.0)).unwrap().is_empty());
///
/// let untouched = circle
///     .modify(&context, Shape::Square(2.0), &mut |_, radius| Ok(radius * 2.0))
///     .unwrap();
/// assert_eq!(untouched, Shape::Square(2.0));
/// assert_eq!(circle.reverse_get(&context, 3.0).unwrap(), Shape::Circle(3.0));
/// ```
pub struct FunctionPrism<S, A, Pr, Re> {
    preview_function: Pr,
    review_function: Re,
    name: Cow<'static, str>,
    _marker: PhantomData<fn(S, A) -> (S, A)>,
}

impl<S, A, Pr, Re> FunctionPrism<S, A, Pr, Re>
where
    Pr: Fn(&S) -> Option<&A>,
    Re: Fn(A) -> S,
{
    /// Creates a prism from `preview` and `review`.
    pub const fn new(preview: Pr, review: Re) -> Self {
        Self {
            preview_function: preview,
            review_function: review,
            name: Cow::Borrowed("Prism"),
            _marker: PhantomData,
        }
    }

    /// Sets the name used in failure traces.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<S, A, Pr: Clone, Re: Clone> Clone for FunctionPrism<S, A, Pr, Re> {
    fn clone(&self) -> Self {
        Self {
            preview_function: self.preview_function.clone(),
            review_function: self.review_function.clone(),
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S, A, Pr, Re> fmt::Debug for FunctionPrism<S, A, Pr, Re> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FunctionPrism")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<S, A, Pr, Re> Optic for FunctionPrism<S, A, Pr, Re>
where
    A: Clone,
    Pr: Fn(&S) -> Option<&A>,
    Re: Fn(A) -> S,
{
    type Index = ();
    type Source = S;
    type Target = S;
    type Focus = A;
    type Replacement = A;
    type Cardinality = Many;
    type Mutability = ReadWrite;
    type Direction = Bi;
    type Purity = Pure;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::leaf(self.name.clone())
    }

    fn iterate(&self, _context: &Context, source: &S, sink: &mut Sink<'_, Record<(), A>>) -> Flow {
        match (self.preview_function)(source) {
            Some(focus) => sink.push(Ok(FocusRecord::new((), focus.clone()))),
            None => Flow::Continue,
        }
    }

    fn length(&self, _context: &Context, source: &S) -> OpticResult<usize> {
        Ok(usize::from((self.preview_function)(source).is_some()))
    }
}

impl<S, A, Pr, Re> Modifier for FunctionPrism<S, A, Pr, Re>
where
    A: Clone,
    Pr: Fn(&S) -> Option<&A>,
    Re: Fn(A) -> S,
{
    fn modify(&self, _context: &Context, source: S, function: &mut MapFn<'_, (), A, A>) -> OpticResult<S> {
        let Some(focus) = (self.preview_function)(&source).cloned() else {
            return Ok(source);
        };
        Ok((self.review_function)(function(&(), focus)?))
    }
}

impl<S, A, Pr, Re> ReverseGetter for FunctionPrism<S, A, Pr, Re>
where
    A: Clone,
    Pr: Fn(&S) -> Option<&A>,
    Re: Fn(A) -> S,
{
    fn reverse_get(&self, _context: &Context, focus: A) -> OpticResult<S> {
        Ok((self.review_function)(focus))
    }
}

/// Builds a [`FunctionPrism`] for a single-field enum variant, named
/// `Case(<variant>)`.
#[macro_export]
macro_rules! prism {
    ($enum_type:ident, $variant:ident) => {
        $crate::leaf::FunctionPrism::new(
            |source: &$enum_type| match *source {
                $enum_type::$variant(ref value) => Some(value),
                #[allow(unreachable_patterns)]
                _ => None,
            },
            |value| $enum_type::$variant(value),
        )
        .named(concat!("Case(", stringify!($variant), ")"))
    };
    ($enum_type:ident < $($generic:tt),+ >, $variant:ident) => {
        $crate::leaf::FunctionPrism::new(
            |source: &$enum_type<$($generic),+>| match *source {
                $enum_type::$variant(ref value) => Some(value),
                #[allow(unreachable_patterns)]
                _ => None,
            },
            |value| $enum_type::$variant(value),
        )
        .named(concat!("Case(", stringify!($variant), ")"))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Token {
        Number(i64),
        Word(String),
    }

    #[test]
    fn test_prism_length_is_zero_or_one() {
        let number = prism!(Token, Number);
        let context = Context::background();
        assert_eq!(number.length(&context, &Token::Number(4)).unwrap(), 1);
        assert_eq!(number.length(&context, &Token::Word("x".into())).unwrap(), 0);
    }

    #[test]
    fn test_prism_modify_matching_case() {
        let number = prism!(Token, Number);
        let updated = number
            .modify(&Context::background(), Token::Number(4), &mut |_, value| Ok(value * 10))
            .unwrap();
        assert_eq!(updated, Token::Number(40));
    }

    #[test]
    fn test_prism_describe() {
        assert_eq!(prism!(Token, Word).describe().to_string(), "Case(Word)");
    }
}
