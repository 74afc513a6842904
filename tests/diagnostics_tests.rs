//! Integration tests for failure traces and diagnostic events.
//!
//! A failure raised at depth `N` of an `N`-leaf chain must carry exactly `N`
//! trace frames, innermost first, however the chain is associated, and
//! error-recovering combinators must forward the errors they do not handle
//! untouched.

#![forbid(unsafe_code)]

use std::io;
use std::sync::Arc;

use lambars_optics::capability::{Fallible, One, ReadOnly, Uni};
use lambars_optics::combinators::{catch, filtered};
use lambars_optics::diagnostics::{Description, render_trace};
use lambars_optics::optic::kind;
use lambars_optics::prelude::*;
use lambars_optics::sequence::Sink;
use lambars_optics::{OpticResult, Record};
use parking_lot::Mutex;
use rstest::rstest;

#[derive(Clone, Debug, PartialEq)]
struct Document {
    sections: Vec<Section>,
}

#[derive(Clone, Debug, PartialEq)]
struct Section {
    code: char,
}

/// Reads a decimal digit, failing with a cast mismatch on anything else.
#[derive(Debug, Clone, Copy)]
struct Digit;

impl Optic for Digit {
    type Index = ();
    type Source = char;
    type Target = char;
    type Focus = u32;
    type Replacement = u32;
    type Cardinality = One;
    type Mutability = ReadOnly;
    type Direction = Uni;
    type Purity = Fallible;
    type Kind = kind::Regular;

    fn describe(&self) -> Description {
        Description::leaf("Digit")
    }

    fn iterate(&self, context: &Context, source: &char, sink: &mut Sink<'_, Record<(), u32>>) -> Flow {
        sink.push(self.get(context, source))
    }
}

impl Getter for Digit {
    fn get(&self, _context: &Context, source: &char) -> OpticResult<FocusRecord<(), u32>> {
        source
            .to_digit(10)
            .map(|digit| FocusRecord::new((), digit))
            .ok_or_else(|| OpticError::cast_mismatch("digit", source.to_string()))
    }
}

fn document(codes: &str) -> Document {
    Document {
        sections: codes.chars().map(|code| Section { code }).collect(),
    }
}

fn expected_trace(leaves: &[&'static str]) -> Vec<Description> {
    leaves.iter().copied().map(Description::leaf).collect()
}

// =============================================================================
// Trace depth under every association
// =============================================================================

#[rstest]
fn test_trace_has_one_frame_per_leaf_left_associated() {
    let chain = lens!(Document, sections)
        .compose(VecTraversal::<Section>::new())
        .compose(lens!(Section, code))
        .compose(Digit);

    let error = chain.foci(&Context::background(), &document("12x")).unwrap_err();

    assert_eq!(
        error.trace(),
        expected_trace(&["Digit", "Field(code)", "Traverse", "Field(sections)"]).as_slice()
    );
}

#[rstest]
fn test_trace_has_one_frame_per_leaf_right_associated() {
    let chain = lens!(Document, sections).compose(
        VecTraversal::<Section>::new().compose(lens!(Section, code).compose(Digit)),
    );

    let error = chain.foci(&Context::background(), &document("x")).unwrap_err();

    assert_eq!(
        error.trace(),
        expected_trace(&["Digit", "Field(code)", "Traverse", "Field(sections)"]).as_slice()
    );
}

#[rstest]
fn test_trace_has_one_frame_per_leaf_balanced() {
    let chain = lens!(Document, sections)
        .compose(VecTraversal::<Section>::new())
        .compose(lens!(Section, code).compose(Digit));

    let error = chain.foci(&Context::background(), &document("7?")).unwrap_err();

    assert_eq!(error.trace().len(), 4);
    assert_eq!(error.trace()[0], Description::leaf("Digit"));
}

#[rstest]
#[case::depth_two(2, vec!["Traverse", "Field(sections)"])]
#[case::depth_three(3, vec!["Field(code)", "Traverse", "Field(sections)"])]
fn test_user_error_trace_matches_failure_depth(#[case] depth: usize, #[case] leaves: Vec<&'static str>) {
    let context = Context::background();
    let source = document("1");

    let error = if depth == 2 {
        lens!(Document, sections)
            .compose(VecTraversal::<Section>::new())
            .modify(&context, source, &mut |_, _| Err(OpticError::user_message("rejected")))
            .unwrap_err()
    } else {
        lens!(Document, sections)
            .compose(VecTraversal::<Section>::new())
            .compose(lens!(Section, code))
            .modify(&context, source, &mut |_, _| Err(OpticError::user_message("rejected")))
            .unwrap_err()
    };

    assert!(error.is_user_error());
    assert_eq!(error.trace(), expected_trace(&leaves).as_slice());
}

#[rstest]
fn test_render_trace_lists_frames_innermost_first() {
    let chain = lens!(Document, sections)
        .compose(VecTraversal::<Section>::new())
        .compose(lens!(Section, code))
        .compose(Digit);

    let error = chain.foci(&Context::background(), &document("x")).unwrap_err();

    assert_eq!(
        render_trace(&error),
        "cast mismatch: expected digit, found x\n  at Digit\n  at Field(code)\n  at Traverse\n  at Field(sections)"
    );
}

// =============================================================================
// Error-recovering combinators
// =============================================================================

#[rstest]
fn test_catch_forwards_unhandled_errors_untouched() {
    let chain = lens!(Document, sections)
        .compose(VecTraversal::<Section>::new())
        .compose(lens!(Section, code))
        .compose(Digit);
    let direct = chain.clone().foci(&Context::background(), &document("1x")).unwrap_err();
    let caught = catch(chain, OpticError::is_cancelled)
        .foci(&Context::background(), &document("1x"))
        .unwrap_err();

    assert_eq!(caught.trace(), direct.trace());
    assert_eq!(render_trace(&caught), render_trace(&direct));
}

#[rstest]
fn test_catch_drops_handled_errors() {
    let chain = lens!(Document, sections)
        .compose(VecTraversal::<Section>::new())
        .compose(lens!(Section, code))
        .compose(Digit);
    let lenient = catch(chain, |error: &OpticError| !error.is_cancelled());

    assert_eq!(lenient.foci(&Context::background(), &document("4a2")).unwrap(), vec![4, 2]);
}

#[rstest]
fn test_filtered_does_not_add_frames() {
    let chain = lens!(Document, sections)
        .compose(VecTraversal::<Section>::new())
        .compose(lens!(Section, code))
        .compose(Digit);
    let small = filtered(chain, |_, digit| *digit < 5);

    let error = small.foci(&Context::background(), &document("19z")).unwrap_err();

    assert_eq!(error.trace().len(), 4);
    assert_eq!(small.describe().leaves().len(), 4);
}

// =============================================================================
// Diagnostic events
// =============================================================================

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[rstest]
fn test_hop_cancellation_is_logged_at_debug() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let (context, handle) = Context::background().with_cancel();
        handle.cancel();
        let optic = VecTraversal::<u8>::new().compose(FunctionIso::new(|value: u8| value, |value: u8| value));
        assert!(optic.foci(&context, &vec![1]).unwrap_err().is_cancelled());
    });

    let output = String::from_utf8(captured.0.lock().clone()).unwrap();
    assert!(output.contains("composition hop observed cancellation"));
    assert!(output.contains("Traverse"));
}
