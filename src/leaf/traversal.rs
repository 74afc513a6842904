//! Traversals over standard containers.
//!
//! # Laws
//!
//! 1. **Modify identity**: `modify(s, |_, x| Ok(x)) == s`
//! 2. **Modify composition**: `modify(modify(s, f), g) == modify(s, g ∘ f)`
//!
//! # Examples
//!
//! ```
//! use lambars_optics::prelude::*;
//!
//! let traversal = VecTraversal::<i32>::new();
//! let context = Context::background();
//!
//! let numbers = vec![1, 2, 3, 4, 5];
//! assert_eq!(traversal.foci(&context, &numbers).unwrap().iter().sum::<i32>(), 15);
//! assert_eq!(traversal.set(&context, numbers, 0).unwrap(), vec![0; 5]);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use crate::capability::{Many, Pure, ReadWrite, Uni};
use crate::context::Context;
use crate::diagnostics::Description;
use crate::error::OpticResult;
use crate::optic::{FocusRecord, MapFn, Modifier, Optic, Record, kind};
use crate::sequence::{Flow, Sink};

macro_rules! marker_traversal {
    ($(#[$meta:meta])* $name:ident < $($param:ident),+ >) => {
        $(#[$meta])*
        pub struct $name<$($param),+> {
            _marker: PhantomData<fn() -> ($($param,)+)>,
        }

        impl<$($param),+> $name<$($param),+> {
            /// Creates the traversal.
            #[must_use]
            pub const fn new() -> Self {
                Self {
                    _marker: PhantomData,
                }
            }
        }

        impl<$($param),+> Default for $name<$($param),+> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<$($param),+> Clone for $name<$($param),+> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<$($param),+> Copy for $name<$($param),+> {}

        impl<$($param),+> fmt::Debug for $name<$($param),+> {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(stringify!($name))
            }
        }
    };
}

marker_traversal! {
    /// Traverses every element of a `Vec`, indexed by position.
    ///
    /// `indexed_get` and `length` answer directly without visiting every
    /// element.
    VecTraversal<A>
}

marker_traversal! {
    /// Traverses every value of a `BTreeMap`, indexed by key, in key order.
    MapTraversal<K, V>
}

marker_traversal! {
    /// Traverses the value of an `Option`, if present.
    OptionTraversal<A>
}

impl<A: Clone> Optic for VecTraversal<A> {
    type Index = usize;
    type Source = Vec<A>;
    type Target = Vec<A>;
    type Focus = A;
    type Replacement = A;
    type Cardinality = Many;
    type Mutability = ReadWrite;
    type Direction = Uni;
    type Purity = Pure;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::leaf("Traverse")
    }

    fn iterate(&self, _context: &Context, source: &Vec<A>, sink: &mut Sink<'_, Record<usize, A>>) -> Flow {
        for (index, focus) in source.iter().enumerate() {
            if sink.push(Ok(FocusRecord::new(index, focus.clone()))).is_stop() {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn indexed_get(
        &self,
        _context: &Context,
        index: &usize,
        source: &Vec<A>,
        sink: &mut Sink<'_, Record<usize, A>>,
    ) -> Flow {
        match source.get(*index) {
            Some(focus) => sink.push(Ok(FocusRecord::new(*index, focus.clone()))),
            None => Flow::Continue,
        }
    }

    fn length(&self, _context: &Context, source: &Vec<A>) -> OpticResult<usize> {
        Ok(source.len())
    }
}

impl<A: Clone> Modifier for VecTraversal<A> {
    fn modify(
        &self,
        _context: &Context,
        source: Vec<A>,
        function: &mut MapFn<'_, usize, A, A>,
    ) -> OpticResult<Vec<A>> {
        source
            .into_iter()
            .enumerate()
            .map(|(index, focus)| function(&index, focus))
            .collect()
    }
}

impl<K: Clone + Ord, V: Clone> Optic for MapTraversal<K, V> {
    type Index = K;
    type Source = BTreeMap<K, V>;
    type Target = BTreeMap<K, V>;
    type Focus = V;
    type Replacement = V;
    type Cardinality = Many;
    type Mutability = ReadWrite;
    type Direction = Uni;
    type Purity = Pure;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::leaf("Values")
    }

    fn iterate(
        &self,
        _context: &Context,
        source: &BTreeMap<K, V>,
        sink: &mut Sink<'_, Record<K, V>>,
    ) -> Flow {
        for (key, value) in source {
            if sink.push(Ok(FocusRecord::new(key.clone(), value.clone()))).is_stop() {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn indexed_get(
        &self,
        _context: &Context,
        index: &K,
        source: &BTreeMap<K, V>,
        sink: &mut Sink<'_, Record<K, V>>,
    ) -> Flow {
        match source.get_key_value(index) {
            Some((key, value)) => sink.push(Ok(FocusRecord::new(key.clone(), value.clone()))),
            None => Flow::Continue,
        }
    }

    fn length(&self, _context: &Context, source: &BTreeMap<K, V>) -> OpticResult<usize> {
        Ok(source.len())
    }
}

impl<K: Clone + Ord, V: Clone> Modifier for MapTraversal<K, V> {
    fn modify(
        &self,
        _context: &Context,
        source: BTreeMap<K, V>,
        function: &mut MapFn<'_, K, V, V>,
    ) -> OpticResult<BTreeMap<K, V>> {
        source
            .into_iter()
            .map(|(key, value)| {
                let value = function(&key, value)?;
                Ok((key, value))
            })
            .collect()
    }
}

impl<A: Clone> Optic for OptionTraversal<A> {
    type Index = ();
    type Source = Option<A>;
    type Target = Option<A>;
    type Focus = A;
    type Replacement = A;
    type Cardinality = Many;
    type Mutability = ReadWrite;
    type Direction = Uni;
    type Purity = Pure;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::leaf("Some")
    }

    fn iterate(&self, _context: &Context, source: &Option<A>, sink: &mut Sink<'_, Record<(), A>>) -> Flow {
        match source {
            Some(focus) => sink.push(Ok(FocusRecord::new((), focus.clone()))),
            None => Flow::Continue,
        }
    }

    fn length(&self, _context: &Context, source: &Option<A>) -> OpticResult<usize> {
        Ok(usize::from(source.is_some()))
    }
}

impl<A: Clone> Modifier for OptionTraversal<A> {
    fn modify(
        &self,
        _context: &Context,
        source: Option<A>,
        function: &mut MapFn<'_, (), A, A>,
    ) -> OpticResult<Option<A>> {
        source.map(|focus| function(&(), focus)).transpose()
    }
}
