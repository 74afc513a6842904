//! Lenses built from a getter and a setter.
//!
//! # Laws
//!
//! A lawful lens satisfies, for every source `s` and values `v`, `w`:
//!
//! 1. **GetPut**: `set(s, get(s)) == s`
//! 2. **PutGet**: `get(set(s, v)) == v`
//! 3. **PutPut**: `set(set(s, v), w) == set(s, w)`
//!
//! # Examples
//!
//! ```
//! use lambars_optics::prelude::*;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Point { x: i32, y: i32 }
//!
//! let x_lens = lens!(Point, x);
//! let context = Context::background();
//!
//! let point = Point { x: 10, y: 20 };
//! assert_eq!(x_lens.get(&context, &point).unwrap().focus, 10);
//!
//! let updated = x_lens.set(&context, point, 100).unwrap();
//! assert_eq!(updated, Point { x: 100, y: 20 });
//! assert_eq!(x_lens.describe().to_string(), "Field(x)");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use crate::capability::{One, Pure, ReadWrite, Uni};
use crate::context::Context;
use crate::diagnostics::Description;
use crate::error::OpticResult;
use crate::optic::{FocusRecord, Getter, MapFn, Modifier, Optic, Record, kind};
use crate::sequence::{Flow, Sink};

/// A lens from a borrowing getter and a rebuilding setter.
///
/// The focus is cloned out of the source when read.
pub struct FunctionLens<S, A, G, St> {
    getter: G,
    setter: St,
    name: Cow<'static, str>,
    _marker: PhantomData<fn(S) -> (S, A)>,
}

impl<S, A, G, St> FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> &A,
    St: Fn(S, A) -> S,
{
    /// Creates a lens from `getter` and `setter`.
    pub const fn new(getter: G, setter: St) -> Self {
        Self {
            getter,
            setter,
            name: Cow::Borrowed("Lens"),
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

impl<S, A, G: Clone, St: Clone> Clone for FunctionLens<S, A, G, St> {
    fn clone(&self) -> Self {
        Self {
            getter: self.getter.clone(),
            setter: self.setter.clone(),
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S, A, G, St> fmt::Debug for FunctionLens<S, A, G, St> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FunctionLens")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<S, A, G, St> Optic for FunctionLens<S, A, G, St>
where
    A: Clone,
    G: Fn(&S) -> &A,
    St: Fn(S, A) -> S,
{
    type Index = ();
    type Source = S;
    type Target = S;
    type Focus = A;
    type Replacement = A;
    type Cardinality = One;
    type Mutability = ReadWrite;
    type Direction = Uni;
    type Purity = Pure;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::leaf(self.name.clone())
    }

    fn iterate(&self, _context: &Context, source: &S, sink: &mut Sink<'_, Record<(), A>>) -> Flow {
        sink.push(Ok(FocusRecord::new((), (self.getter)(source).clone())))
    }

    fn length(&self, _context: &Context, _source: &S) -> OpticResult<usize> {
        Ok(1)
    }
}

impl<S, A, G, St> Getter for FunctionLens<S, A, G, St>
where
    A: Clone,
    G: Fn(&S) -> &A,
    St: Fn(S, A) -> S,
{
    fn get(&self, _context: &Context, source: &S) -> OpticResult<FocusRecord<(), A>> {
        Ok(FocusRecord::new((), (self.getter)(source).clone()))
    }
}

impl<S, A, G, St> Modifier for FunctionLens<S, A, G, St>
where
    A: Clone,
    G: Fn(&S) -> &A,
    St: Fn(S, A) -> S,
{
    fn modify(&self, _context: &Context, source: S, function: &mut MapFn<'_, (), A, A>) -> OpticResult<S> {
        let focus = (self.getter)(&source).clone();
        let replaced = function(&(), focus)?;
        Ok((self.setter)(source, replaced))
    }
}

/// Builds a [`FunctionLens`] for a struct field, named `Field(<field>)`.
///
/// # Examples
///
/// ```
/// use lambars_optics::lens;
///
/// #[derive(Clone)]
/// struct Wrapper<T> { value: T }
///
/// let value_lens = lens!(Wrapper<u8>, value);
/// # let _ = value_lens;
/// ```
#[macro_export]
macro_rules! lens {
    ($struct_type:ident, $field:ident) => {
        $crate::leaf::FunctionLens::new(
            |source: &$struct_type| &source.$field,
            |mut source: $struct_type, value| {
                source.$field = value;
                source
            },
        )
        .named(concat!("Field(", stringify!($field), ")"))
    };
    ($struct_type:ident < $($generic:tt),+ >, $field:ident) => {
        $crate::leaf::FunctionLens::new(
            |source: &$struct_type<$($generic),+>| &source.$field,
            |mut source: $struct_type<$($generic),+>, value| {
                source.$field = value;
                source
            },
        )
        .named(concat!("Field(", stringify!($field), ")"))
    };
    ($struct_type:path, $field:ident) => {
        $crate::leaf::FunctionLens::new(
            |source: &$struct_type| &source.$field,
            |mut source: $struct_type, value| {
                source.$field = value;
                source
            },
        )
        .named(concat!("Field(", stringify!($field), ")"))
    };
}
