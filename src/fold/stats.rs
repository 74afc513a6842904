//! Order statistics: [`Median`] and [`Mode`].

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::hash::Hash;

use super::Reducer;
use super::numeric::{Numeric, Ranked};
use crate::error::{OpticError, OpticResult};

#[cfg(feature = "fxhash")]
type Histogram<A> = rustc_hash::FxHashMap<A, Tally>;

#[cfg(not(feature = "fxhash"))]
type Histogram<A> = std::collections::HashMap<A, Tally>;

/// The median focus.
///
/// Odd-length folds return the middle focus; even-length folds return the
/// value halfway between the two middle foci.
///
/// # Examples
///
/// ```
/// use lambars_optics::prelude::*;
/// use lambars_optics::fold::{reduce, Median};
///
/// let context = Context::background();
/// let odd = vec![1, 2, 3, 20, 40, 45, 50];
/// assert_eq!(reduce(&VecTraversal::new(), &context, &odd, &Median).unwrap(), 20);
///
/// let even = vec![1.0, 2.0, 3.0, 4.0];
/// assert_eq!(reduce(&VecTraversal::new(), &context, &even, &Median).unwrap(), 2.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Median;

/// Two heaps splitting the foci seen so far at the median.
///
/// `upper` holds as many foci as `lower`, or one fewer.
#[derive(Debug, Clone)]
pub struct MedianState<N> {
    lower: BinaryHeap<Ranked<N>>,
    upper: BinaryHeap<Reverse<Ranked<N>>>,
}

impl<N: Numeric> MedianState<N> {
    fn push(&mut self, focus: N) {
        let focus = Ranked(focus);
        match self.lower.peek() {
            Some(top) if focus > *top => self.upper.push(Reverse(focus)),
            _ => self.lower.push(focus),
        }
        if self.lower.len() > self.upper.len() + 1 {
            if let Some(moved) = self.lower.pop() {
                self.upper.push(Reverse(moved));
            }
        } else if self.upper.len() > self.lower.len() {
            if let Some(Reverse(moved)) = self.upper.pop() {
                self.lower.push(moved);
            }
        }
    }

    fn median(&self) -> OpticResult<N> {
        let lower = self.lower.peek().ok_or_else(OpticError::empty_get)?;
        match self.upper.peek() {
            Some(Reverse(upper)) if self.upper.len() == self.lower.len() => {
                Ok(lower.0.halfway(upper.0))
            }
            _ => Ok(lower.0),
        }
    }
}

impl<N: Numeric> Reducer<N> for Median {
    type State = MedianState<N>;
    type Output = N;

    fn seed(&self) -> MedianState<N> {
        MedianState {
            lower: BinaryHeap::new(),
            upper: BinaryHeap::new(),
        }
    }

    fn step(&self, state: &mut MedianState<N>, focus: N) -> OpticResult<()> {
        state.push(focus);
        Ok(())
    }

    fn finish(&self, state: MedianState<N>) -> OpticResult<N> {
        state.median()
    }
}

/// The most frequent focus; among equally frequent foci, the one seen
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mode;

#[derive(Debug, Clone, Copy)]
struct Tally {
    count: usize,
    first_seen: usize,
}

/// Occurrence counts of the foci seen so far.
#[derive(Debug, Clone)]
pub struct ModeState<A> {
    histogram: Histogram<A>,
    seen: usize,
}

impl<A: Eq + Hash> Reducer<A> for Mode {
    type State = ModeState<A>;
    type Output = A;

    fn seed(&self) -> ModeState<A> {
        ModeState {
            histogram: Histogram::default(),
            seen: 0,
        }
    }

    fn step(&self, state: &mut ModeState<A>, focus: A) -> OpticResult<()> {
        let position = state.seen;
        state
            .histogram
            .entry(focus)
            .or_insert(Tally {
                count: 0,
                first_seen: position,
            })
            .count += 1;
        state.seen += 1;
        Ok(())
    }

    fn finish(&self, state: ModeState<A>) -> OpticResult<A> {
        state
            .histogram
            .into_iter()
            .max_by(|(_, left), (_, right)| {
                left.count
                    .cmp(&right.count)
                    .then_with(|| right.first_seen.cmp(&left.first_seen))
            })
            .map(|(focus, _)| focus)
            .ok_or_else(OpticError::empty_get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run<A, R: Reducer<A>>(reducer: &R, foci: impl IntoIterator<Item = A>) -> OpticResult<R::Output> {
        let mut state = reducer.seed();
        for focus in foci {
            reducer.step(&mut state, focus)?;
        }
        reducer.finish(state)
    }

    #[rstest]
    #[case(vec![1, 2, 3, 20, 40, 45, 50], 20)]
    #[case(vec![50, 45, 40, 20, 3, 2, 1], 20)]
    #[case(vec![7], 7)]
    #[case(vec![1, 2, 3, 4], 2)]
    #[case(vec![10, 30], 20)]
    #[case(vec![-5, -5, 9], -5)]
    fn test_median(#[case] foci: Vec<i32>, #[case] expected: i32) {
        assert_eq!(run(&Median, foci).unwrap(), expected);
    }

    #[test]
    fn test_median_heap_sizes_stay_balanced() {
        let mut state = <Median as Reducer<u32>>::seed(&Median);
        for focus in [9, 1, 8, 2, 7, 3, 6] {
            state.push(focus);
            assert!(state.upper.len() == state.lower.len() || state.upper.len() + 1 == state.lower.len());
        }
    }

    #[test]
    fn test_median_of_empty_is_empty_get() {
        assert!(run(&Median, Vec::<f64>::new()).unwrap_err().is_empty_get());
    }

    #[test]
    fn test_mode_prefers_first_seen_on_ties() {
        assert_eq!(run(&Mode, vec!["b", "a", "a", "b", "c"]).unwrap(), "b");
        assert_eq!(run(&Mode, vec![3, 1, 1, 2]).unwrap(), 1);
    }

    #[test]
    fn test_mode_of_empty_is_empty_get() {
        assert!(run(&Mode, Vec::<char>::new()).unwrap_err().is_empty_get());
    }
}
