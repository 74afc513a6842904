//! Push-style, single-pass sequences.
//!
//! Optics enumerate their foci by *pushing* records into a [`Sink`]. The
//! consumer answers every record with a [`Flow`]; once it answers
//! [`Flow::Stop`] the producer must not push again.
//!
//! The sink enforces that contract as an explicit state machine:
//!
//! ```text
//! Active --consumer returns Stop--> Stopped --push--> Violated --push--> Violated
//! ```
//!
//! A rejected record is never delivered. Rejections are reported by
//! [`Sink::finish`] as a [`SequenceViolation`], which bounding combinators
//! such as [`Take`] absorb and turn into normal termination.
//!
//! For combinators that need to interleave two sequences element by element,
//! [`Pull`] reifies a push sequence as a pull iterator with an explicit
//! [`Pull::stop`]; its buffer is released on every exit path when it drops.
//!
//! # Examples
//!
//! ```
//! use lambars_optics::sequence::{from_fn, Flow, Sequence};
//!
//! let numbers = from_fn(|sink| {
//!     for number in 0.. {
//!         if sink.push(number).is_stop() {
//!             return Flow::Stop;
//!         }
//!     }
//!     Flow::Continue
//! });
//!
//! let first_three = numbers.take(3).collect_vec().unwrap();
//! assert_eq!(first_three, vec![0, 1, 2]);
//! ```

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::error::SequenceViolation;

/// A consumer's answer to a pushed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Keep producing.
    Continue,
    /// Stop producing; no further record may be pushed.
    Stop,
}

impl Flow {
    /// Returns `true` for [`Flow::Stop`].
    #[must_use]
    pub const fn is_stop(self) -> bool {
        matches!(self, Self::Stop)
    }

    /// Returns `true` for [`Flow::Continue`].
    #[must_use]
    pub const fn is_continue(self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// State of a [`Sink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkState {
    /// Records are delivered to the consumer.
    Active,
    /// The consumer stopped; further records are rejected.
    Stopped,
    /// A record was pushed after the consumer stopped.
    Violated,
}

/// The receiving end of a push sequence.
///
/// Wraps a consumer callback and tracks whether it has stopped.
pub struct Sink<'s, T> {
    consumer: &'s mut dyn FnMut(T) -> Flow,
    state: SinkState,
    rejected: usize,
}

impl<'s, T> Sink<'s, T> {
    /// Wraps `consumer` in an active sink.
    pub fn new(consumer: &'s mut dyn FnMut(T) -> Flow) -> Self {
        Self {
            consumer,
            state: SinkState::Active,
            rejected: 0,
        }
    }

    /// Pushes one record.
    ///
    /// Returns the consumer's answer. Pushing into a stopped sink does not
    /// reach the consumer: the record is counted as a contract violation and
    /// [`Flow::Stop`] is returned again.
    pub fn push(&mut self, item: T) -> Flow {
        match self.state {
            SinkState::Active => {
                let flow = (self.consumer)(item);
                if flow.is_stop() {
                    self.state = SinkState::Stopped;
                }
                flow
            }
            SinkState::Stopped | SinkState::Violated => {
                self.state = SinkState::Violated;
                self.rejected += 1;
                tracing::warn!(
                    rejected = self.rejected,
                    "sequence producer pushed a record after its consumer stopped"
                );
                Flow::Stop
            }
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> SinkState {
        self.state
    }

    /// Returns `true` once the consumer has stopped.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        !matches!(self.state, SinkState::Active)
    }

    /// Records violations reported by a nested producer.
    pub fn absorb(&mut self, violation: SequenceViolation) {
        self.rejected += violation.rejected;
    }

    /// Ends the sequence, reporting any contract violation.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceViolation`] if a record was pushed after stop.
    pub fn finish(self) -> Result<(), SequenceViolation> {
        if self.rejected == 0 {
            Ok(())
        } else {
            Err(SequenceViolation {
                rejected: self.rejected,
            })
        }
    }

    /// Runs a nested producer whose records are forwarded into this sink.
    ///
    /// `produce` receives a fresh inner sink; every record it pushes is
    /// handed to `forward` together with this sink. Violations of the inner
    /// producer are absorbed into this sink.
    pub fn nest<U>(
        &mut self,
        produce: impl FnOnce(&mut Sink<'_, U>) -> Flow,
        mut forward: impl FnMut(&mut Self, U) -> Flow,
    ) -> Flow {
        let (flow, outcome) = {
            let mut consumer = |item: U| forward(self, item);
            let mut inner = Sink::new(&mut consumer);
            let flow = produce(&mut inner);
            (flow, inner.finish())
        };
        if let Err(violation) = outcome {
            self.absorb(violation);
        }
        flow
    }
}

impl<T> std::fmt::Debug for Sink<'_, T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Sink")
            .field("state", &self.state)
            .field("rejected", &self.rejected)
            .finish_non_exhaustive()
    }
}

/// Runs `produce`, feeding every record through a fallible `step`.
///
/// Stops the producer at the first error and returns it. A contract
/// violation is reported only if no step failed.
///
/// # Errors
///
/// Returns the first error of `step`, or the converted
/// [`SequenceViolation`].
pub fn try_drive<T, E>(
    produce: impl FnOnce(&mut Sink<'_, T>) -> Flow,
    mut step: impl FnMut(T) -> Result<Flow, E>,
) -> Result<(), E>
where
    E: From<SequenceViolation>,
{
    let mut failure = None;
    let outcome = {
        let mut consumer = |item: T| match step(item) {
            Ok(flow) => flow,
            Err(error) => {
                failure = Some(error);
                Flow::Stop
            }
        };
        let mut sink = Sink::new(&mut consumer);
        produce(&mut sink);
        sink.finish()
    };
    match failure {
        Some(error) => Err(error),
        None => outcome.map_err(E::from),
    }
}

/// A reified push sequence.
pub trait Sequence {
    /// The record type.
    type Item;

    /// Pushes every record into `sink` until exhausted or stopped.
    ///
    /// Returns [`Flow::Stop`] if the sink's consumer stopped the sequence.
    fn run(&self, sink: &mut Sink<'_, Self::Item>) -> Flow;

    /// Feeds every record to `consumer`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceViolation`] if the producer broke the push
    /// contract.
    fn for_each<F>(&self, mut consumer: F) -> Result<(), SequenceViolation>
    where
        F: FnMut(Self::Item) -> Flow,
    {
        let mut sink = Sink::new(&mut consumer);
        self.run(&mut sink);
        sink.finish()
    }

    /// Collects every record.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceViolation`] if the producer broke the push
    /// contract.
    fn collect_vec(&self) -> Result<Vec<Self::Item>, SequenceViolation> {
        let mut items = Vec::new();
        self.for_each(|item| {
            items.push(item);
            Flow::Continue
        })?;
        Ok(items)
    }

    /// Bounds the sequence to at most `limit` records.
    fn take(self, limit: usize) -> Take<Self>
    where
        Self: Sized,
    {
        Take {
            inner: self,
            limit,
        }
    }

    /// Reifies at most the first `limit` records as a pull iterator.
    ///
    /// The producer is stopped once the bound is reached, so unbounded
    /// sequences can be pulled from.
    fn pull(&self, limit: usize) -> Pull<Self::Item> {
        Pull::bounded(|sink| self.run(sink), limit)
    }
}

/// A sequence backed by a producer closure. See [`from_fn`].
pub struct FromFn<T, F> {
    producer: F,
    _marker: PhantomData<fn() -> T>,
}

/// Creates a sequence from a producer closure.
pub const fn from_fn<T, F>(producer: F) -> FromFn<T, F>
where
    F: Fn(&mut Sink<'_, T>) -> Flow,
{
    FromFn {
        producer,
        _marker: PhantomData,
    }
}

impl<T, F> Sequence for FromFn<T, F>
where
    F: Fn(&mut Sink<'_, T>) -> Flow,
{
    type Item = T;

    fn run(&self, sink: &mut Sink<'_, T>) -> Flow {
        (self.producer)(sink)
    }
}

/// A sequence bounded to its first `limit` records. See [`Sequence::take`].
#[derive(Debug, Clone)]
pub struct Take<Q> {
    inner: Q,
    limit: usize,
}

impl<Q: Sequence> Sequence for Take<Q> {
    type Item = Q::Item;

    fn run(&self, sink: &mut Sink<'_, Q::Item>) -> Flow {
        if self.limit == 0 {
            return Flow::Continue;
        }
        let mut remaining = self.limit;
        let outcome = {
            let mut consumer = |item: Q::Item| {
                let flow = sink.push(item);
                remaining -= 1;
                if remaining == 0 { Flow::Stop } else { flow }
            };
            let mut bounded = Sink::new(&mut consumer);
            self.inner.run(&mut bounded);
            bounded.finish()
        };
        // Records pushed past the bound end the sequence normally.
        if let Err(violation) = outcome {
            tracing::trace!(
                rejected = violation.rejected,
                "take absorbed records produced after its bound"
            );
        }
        if sink.is_stopped() {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }
}

/// A push sequence reified as a pull iterator.
///
/// The producer runs when the adapter is created and at most `limit` of its
/// records are buffered; `stop` releases the buffer early, and so does
/// dropping the adapter on any exit path.
#[derive(Debug)]
pub struct Pull<T> {
    buffer: VecDeque<T>,
    stopped: bool,
    violation: Option<SequenceViolation>,
}

impl<T> Pull<T> {
    /// Drains at most `limit` records of `produce` into a new adapter,
    /// stopping the producer once the bound is reached.
    pub fn bounded(produce: impl FnOnce(&mut Sink<'_, T>) -> Flow, limit: usize) -> Self {
        let mut buffer = VecDeque::new();
        if limit == 0 {
            return Self {
                buffer,
                stopped: false,
                violation: None,
            };
        }
        let outcome = {
            let mut consumer = |item: T| {
                buffer.push_back(item);
                if buffer.len() >= limit {
                    Flow::Stop
                } else {
                    Flow::Continue
                }
            };
            let mut sink = Sink::new(&mut consumer);
            produce(&mut sink);
            sink.finish()
        };
        Self {
            buffer,
            stopped: false,
            violation: outcome.err(),
        }
    }

    /// Releases the remaining records; `next` returns `None` afterwards.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.buffer.clear();
    }

    /// Returns `true` once [`Pull::stop`] has been called.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The contract violation the producer committed while filling, if any.
    #[must_use]
    pub const fn violation(&self) -> Option<SequenceViolation> {
        self.violation
    }
}

impl<T> Iterator for Pull<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.stopped {
            return None;
        }
        self.buffer.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.stopped {
            (0, Some(0))
        } else {
            (self.buffer.len(), Some(self.buffer.len()))
        }
    }
}

impl<T> Drop for Pull<T> {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            tracing::trace!(
                pending = self.buffer.len(),
                "pull adapter released with pending records"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(limit: usize) -> FromFn<usize, impl Fn(&mut Sink<'_, usize>) -> Flow> {
        from_fn(move |sink| {
            for number in 0..limit {
                if sink.push(number).is_stop() {
                    return Flow::Stop;
                }
            }
            Flow::Continue
        })
    }

    fn ignoring_stop() -> FromFn<usize, impl Fn(&mut Sink<'_, usize>) -> Flow> {
        from_fn(|sink| {
            for number in 0..5 {
                sink.push(number);
            }
            Flow::Continue
        })
    }

    #[test]
    fn test_collect_vec_exhausts_sequence() {
        assert_eq!(counting(4).collect_vec(), Ok(vec![0, 1, 2, 3]));
    }

    #[test]
    fn test_consumer_stop_is_honoured() {
        let mut seen = Vec::new();
        let result = counting(10).for_each(|number| {
            seen.push(number);
            if number == 2 { Flow::Stop } else { Flow::Continue }
        });
        assert!(result.is_ok());
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_push_after_stop_is_rejected_and_reported() {
        let mut seen = Vec::new();
        let result = ignoring_stop().for_each(|number| {
            seen.push(number);
            Flow::Stop
        });
        assert_eq!(seen, vec![0]);
        assert_eq!(result, Err(SequenceViolation { rejected: 4 }));
    }

    #[test]
    fn test_take_absorbs_violation() {
        let taken = ignoring_stop().take(2).collect_vec();
        assert_eq!(taken, Ok(vec![0, 1]));
    }

    #[test]
    fn test_take_zero_produces_nothing() {
        assert_eq!(counting(3).take(0).collect_vec(), Ok(vec![]));
    }

    #[test]
    fn test_take_longer_than_sequence() {
        assert_eq!(counting(2).take(5).collect_vec(), Ok(vec![0, 1]));
    }

    #[test]
    fn test_nest_forwards_and_absorbs() {
        let mut seen = Vec::new();
        let mut consumer = |item: usize| {
            seen.push(item);
            Flow::Continue
        };
        let mut sink = Sink::new(&mut consumer);
        let flow = sink.nest(
            |inner| ignoring_stop().run(inner),
            |outer, item: usize| {
                outer.push(item * 10);
                Flow::Stop
            },
        );
        assert_eq!(flow, Flow::Continue);
        assert!(!sink.is_stopped());
        assert_eq!(sink.finish(), Err(SequenceViolation { rejected: 4 }));
        assert_eq!(seen, vec![0]);
    }

    #[test]
    fn test_try_drive_short_circuits() {
        let mut seen = Vec::new();
        let result: Result<(), SequenceViolation> = try_drive(
            |sink| counting(10).run(sink),
            |number| {
                seen.push(number);
                if number == 3 {
                    Err(SequenceViolation { rejected: 0 })
                } else {
                    Ok(Flow::Continue)
                }
            },
        );
        assert_eq!(result, Err(SequenceViolation { rejected: 0 }));
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_pull_yields_in_order_and_stops() {
        let mut pull = counting(5).pull(usize::MAX);
        assert_eq!(pull.next(), Some(0));
        assert_eq!(pull.next(), Some(1));
        pull.stop();
        assert!(pull.is_stopped());
        assert_eq!(pull.next(), None);
    }

    #[test]
    fn test_pull_bounded_stops_infinite_producer() {
        let infinite = from_fn(|sink: &mut Sink<'_, u64>| {
            let mut number = 0;
            loop {
                if sink.push(number).is_stop() {
                    return Flow::Stop;
                }
                number += 1;
            }
        });
        let pull = Pull::bounded(|sink| infinite.run(sink), 3);
        assert_eq!(pull.collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_pull_of_unbounded_sequence_is_bounded() {
        let naturals = from_fn(|sink: &mut Sink<'_, u32>| {
            let mut number = 0;
            loop {
                if sink.push(number).is_stop() {
                    return Flow::Stop;
                }
                number += 1;
            }
        });
        let mut pull = naturals.pull(2);
        assert_eq!(pull.next(), Some(0));
        assert_eq!(pull.next(), Some(1));
        assert_eq!(pull.next(), None);
        assert_eq!(pull.violation(), None);
    }

    #[test]
    fn test_pull_records_violation() {
        let pull = Pull::bounded(|sink| ignoring_stop().run(sink), 1);
        assert_eq!(pull.violation(), Some(SequenceViolation { rejected: 4 }));
    }
}
