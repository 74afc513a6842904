//! General-purpose reducers and their tuple composites.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use super::Reducer;
use super::numeric::Numeric;
use crate::error::{OpticError, OpticResult};

/// Adds every focus. An empty fold sums to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sum;

impl<N: Numeric> Reducer<N> for Sum {
    type State = N;
    type Output = N;

    fn seed(&self) -> N {
        N::ZERO
    }

    fn step(&self, state: &mut N, focus: N) -> OpticResult<()> {
        *state = state.accumulate(focus);
        Ok(())
    }

    fn finish(&self, state: N) -> OpticResult<N> {
        Ok(state)
    }
}

/// Multiplies every focus. An empty fold multiplies to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Product;

impl<N: Numeric> Reducer<N> for Product {
    type State = N;
    type Output = N;

    fn seed(&self) -> N {
        N::ONE
    }

    fn step(&self, state: &mut N, focus: N) -> OpticResult<()> {
        *state = state.scale(focus);
        Ok(())
    }

    fn finish(&self, state: N) -> OpticResult<N> {
        Ok(state)
    }
}

/// Running extremum seeded with a sentinel.
#[derive(Debug, Clone, Copy)]
pub struct Extremum<N> {
    value: N,
    seen: bool,
}

impl<N: Numeric> Extremum<N> {
    const fn seeded(sentinel: N) -> Self {
        Self {
            value: sentinel,
            seen: false,
        }
    }

    fn replace_if(&mut self, focus: N, wanted: Ordering) {
        if !self.seen || focus.total_order(&self.value) == wanted {
            self.value = focus;
        }
        self.seen = true;
    }

    fn into_result(self) -> OpticResult<N> {
        if self.seen {
            Ok(self.value)
        } else {
            Err(OpticError::empty_get())
        }
    }
}

/// The smallest focus by [`Numeric::total_order`]; the first one on ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Min;

impl<N: Numeric> Reducer<N> for Min {
    type State = Extremum<N>;
    type Output = N;

    fn seed(&self) -> Extremum<N> {
        Extremum::seeded(N::MAX_SENTINEL)
    }

    fn step(&self, state: &mut Extremum<N>, focus: N) -> OpticResult<()> {
        state.replace_if(focus, Ordering::Less);
        Ok(())
    }

    fn finish(&self, state: Extremum<N>) -> OpticResult<N> {
        state.into_result()
    }
}

/// The largest focus by [`Numeric::total_order`]; the first one on ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Max;

impl<N: Numeric> Reducer<N> for Max {
    type State = Extremum<N>;
    type Output = N;

    fn seed(&self) -> Extremum<N> {
        Extremum::seeded(N::MIN_SENTINEL)
    }

    fn step(&self, state: &mut Extremum<N>, focus: N) -> OpticResult<()> {
        state.replace_if(focus, Ordering::Greater);
        Ok(())
    }

    fn finish(&self, state: Extremum<N>) -> OpticResult<N> {
        state.into_result()
    }
}

/// The arithmetic mean. Integer means truncate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mean;

impl<N: Numeric> Reducer<N> for Mean {
    type State = (N, usize);
    type Output = N;

    fn seed(&self) -> (N, usize) {
        (N::ZERO, 0)
    }

    fn step(&self, state: &mut (N, usize), focus: N) -> OpticResult<()> {
        state.0 = state.0.accumulate(focus);
        state.1 += 1;
        Ok(())
    }

    fn finish(&self, (total, count): (N, usize)) -> OpticResult<N> {
        if count == 0 {
            return Err(OpticError::empty_get());
        }
        Ok(total / N::from_count(count))
    }
}

/// Counts foci of any type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Count;

impl<A> Reducer<A> for Count {
    type State = usize;
    type Output = usize;

    fn seed(&self) -> usize {
        0
    }

    fn step(&self, state: &mut usize, _focus: A) -> OpticResult<()> {
        *state += 1;
        Ok(())
    }

    fn finish(&self, state: usize) -> OpticResult<usize> {
        Ok(state)
    }
}

/// The first focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct First;

impl<A> Reducer<A> for First {
    type State = Option<A>;
    type Output = A;

    fn seed(&self) -> Option<A> {
        None
    }

    fn step(&self, state: &mut Option<A>, focus: A) -> OpticResult<()> {
        if state.is_none() {
            *state = Some(focus);
        }
        Ok(())
    }

    fn finish(&self, state: Option<A>) -> OpticResult<A> {
        state.ok_or_else(OpticError::empty_get)
    }
}

/// A left fold from an initial value and a fallible step function.
///
/// # Examples
///
/// ```
/// use lambars_optics::prelude::*;
/// use lambars_optics::fold::{reduce, FunctionReducer};
///
/// let joined = FunctionReducer::new(String::new(), |mut text: String, word: &'static str| {
///     text.push_str(word);
///     Ok(text)
/// });
/// let words = vec!["ab", "cd"];
/// let result = reduce(&VecTraversal::new(), &Context::background(), &words, &joined);
/// assert_eq!(result.unwrap(), "abcd");
/// ```
pub struct FunctionReducer<S, A, F> {
    initial: S,
    function: F,
    _marker: PhantomData<fn(A)>,
}

impl<S, A, F> FunctionReducer<S, A, F>
where
    S: Clone,
    F: Fn(S, A) -> OpticResult<S>,
{
    /// Folds from `initial` with `function`.
    pub const fn new(initial: S, function: F) -> Self {
        Self {
            initial,
            function,
            _marker: PhantomData,
        }
    }
}

impl<S: fmt::Debug, A, F> fmt::Debug for FunctionReducer<S, A, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FunctionReducer")
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

impl<S, A, F> Reducer<A> for FunctionReducer<S, A, F>
where
    S: Clone,
    F: Fn(S, A) -> OpticResult<S>,
{
    // `None` only while a step is running.
    type State = Option<S>;
    type Output = S;

    fn seed(&self) -> Option<S> {
        Some(self.initial.clone())
    }

    fn step(&self, state: &mut Option<S>, focus: A) -> OpticResult<()> {
        if let Some(current) = state.take() {
            *state = Some((self.function)(current, focus)?);
        }
        Ok(())
    }

    fn finish(&self, state: Option<S>) -> OpticResult<S> {
        state.ok_or_else(OpticError::empty_get)
    }
}

macro_rules! tuple_reducer {
    ($($position:tt),+) => {
        paste::paste! {
            impl<Focus, $([<R $position>]),+> Reducer<Focus> for ($([<R $position>],)+)
            where
                Focus: Clone,
                $([<R $position>]: Reducer<Focus>,)+
            {
                type State = ($([<R $position>]::State,)+);
                type Output = ($([<R $position>]::Output,)+);

                fn seed(&self) -> Self::State {
                    ($(self.$position.seed(),)+)
                }

                fn step(&self, state: &mut Self::State, focus: Focus) -> OpticResult<()> {
                    $(self.$position.step(&mut state.$position, focus.clone())?;)+
                    Ok(())
                }

                fn finish(&self, state: Self::State) -> OpticResult<Self::Output> {
                    Ok(($(self.$position.finish(state.$position)?,)+))
                }
            }
        }
    };
}

tuple_reducer!(0, 1);
tuple_reducer!(0, 1, 2);
tuple_reducer!(0, 1, 2, 3);
tuple_reducer!(0, 1, 2, 3, 4);
tuple_reducer!(0, 1, 2, 3, 4, 5);
tuple_reducer!(0, 1, 2, 3, 4, 5, 6);
tuple_reducer!(0, 1, 2, 3, 4, 5, 6, 7);
tuple_reducer!(0, 1, 2, 3, 4, 5, 6, 7, 8);
