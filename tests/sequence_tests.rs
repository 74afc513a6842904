//! Integration tests for the push-sequence protocol.
//!
//! Producers must stop pushing once their consumer answers `Stop`; the
//! protocol reports producers that do not.

#![forbid(unsafe_code)]

use lambars_optics::capability::{Many, Pure, ReadOnly, Uni};
use lambars_optics::diagnostics::Description;
use lambars_optics::optic::kind;
use lambars_optics::prelude::*;
use lambars_optics::sequence::{Sink, SinkState, from_fn, try_drive};
use lambars_optics::{Record, SequenceViolation};
use rstest::rstest;

/// A leaf that ignores `Stop` and pushes every character regardless.
#[derive(Debug, Clone, Copy)]
struct Stubborn;

impl Optic for Stubborn {
    type Index = usize;
    type Source = String;
    type Target = String;
    type Focus = char;
    type Replacement = char;
    type Cardinality = Many;
    type Mutability = ReadOnly;
    type Direction = Uni;
    type Purity = Pure;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::leaf("Stubborn")
    }

    fn iterate(&self, _context: &Context, source: &String, sink: &mut Sink<'_, Record<usize, char>>) -> Flow {
        for (index, character) in source.chars().enumerate() {
            sink.push(Ok(FocusRecord::new(index, character)));
        }
        Flow::Continue
    }
}

// =============================================================================
// Contract state machine
// =============================================================================

#[rstest]
fn test_sink_state_machine() {
    let mut delivered = Vec::new();
    let mut consumer = |item: u8| {
        delivered.push(item);
        if item == 2 { Flow::Stop } else { Flow::Continue }
    };
    let mut sink = Sink::new(&mut consumer);

    assert_eq!(sink.state(), SinkState::Active);
    assert!(sink.push(1).is_continue());
    assert!(sink.push(2).is_stop());
    assert_eq!(sink.state(), SinkState::Stopped);
    assert!(sink.push(3).is_stop());
    assert_eq!(sink.state(), SinkState::Violated);
    assert_eq!(sink.finish(), Err(SequenceViolation { rejected: 1 }));
    assert_eq!(delivered, vec![1, 2]);
}

#[rstest]
fn test_violating_leaf_is_reported_by_first() {
    let error = Stubborn
        .first(&Context::background(), &"abc".to_string())
        .unwrap_err();

    assert!(error.is_sequence_violation());
}

#[rstest]
fn test_violating_leaf_inside_composition_is_reported() {
    let optic = compose_both(VecTraversal::<String>::new(), Stubborn);
    let words = vec!["hi".to_string(), "yo".to_string()];
    let mut seen = 0;

    let outcome = optic.sequence(&Context::background(), &words).for_each(|_| {
        seen += 1;
        Flow::Stop
    });

    assert_eq!(seen, 1);
    assert!(outcome.is_err());
}

#[rstest]
fn test_well_behaved_leaf_passes_take() {
    let optic = VecTraversal::<u8>::new();
    let source = vec![1, 2, 3];

    let taken = optic.sequence(&Context::background(), &source).take(2).collect_vec();

    assert_eq!(taken.unwrap().len(), 2);
}

#[rstest]
fn test_take_absorbs_violations_past_its_bound() {
    let taken = Stubborn
        .sequence(&Context::background(), &"abcdef".to_string())
        .take(2)
        .collect_vec()
        .unwrap();

    let characters: Vec<char> = taken.into_iter().map(|record| record.unwrap().focus).collect();
    assert_eq!(characters, vec!['a', 'b']);
}

// =============================================================================
// Drivers
// =============================================================================

#[rstest]
#[case(vec![1, 2, 3], Ok(6))]
#[case(vec![1, -2, 3], Err("negative"))]
fn test_try_drive_short_circuits(#[case] input: Vec<i32>, #[case] expected: Result<i32, &str>) {
    #[derive(Debug, PartialEq)]
    enum Failure {
        Negative,
        Violation,
    }

    impl From<SequenceViolation> for Failure {
        fn from(_: SequenceViolation) -> Self {
            Self::Violation
        }
    }

    let producer = from_fn(|sink: &mut Sink<'_, i32>| {
        for value in &input {
            if sink.push(*value).is_stop() {
                return Flow::Stop;
            }
        }
        Flow::Continue
    });
    let mut total = 0;
    let outcome = try_drive(
        |sink| producer.run(sink),
        |value| {
            if value < 0 {
                return Err(Failure::Negative);
            }
            total += value;
            Ok(Flow::Continue)
        },
    );

    match expected {
        Ok(sum) => {
            assert_eq!(outcome, Ok(()));
            assert_eq!(total, sum);
        }
        Err(_) => assert_eq!(outcome, Err(Failure::Negative)),
    }
}

// =============================================================================
// Pull adapter
// =============================================================================

#[rstest]
fn test_pull_yields_in_order_and_stops() {
    let optic = VecTraversal::<char>::new();
    let context = Context::background();
    let source = vec!['x', 'y', 'z'];
    let mut pulled = optic.sequence(&context, &source).pull(source.len());

    assert_eq!(pulled.next().unwrap().unwrap().focus, 'x');
    pulled.stop();
    assert!(pulled.is_stopped());
    assert!(pulled.next().is_none());
}
