//! Property-based tests for the laws of the generic leaf optics.
//!
//! - **Lens GetPut**: `set(s, get(s)) == s`
//! - **Lens PutGet**: `get(set(s, v)) == v`
//! - **Lens PutPut**: `set(set(s, v1), v2) == set(s, v2)`
//! - **Prism PreviewReview**: `preview(review(v)) == Some(v)`
//! - **Iso RoundTrip**: `reverse_get(get(s)) == s`
//! - **Traversal Identity**: `modify(s, id) == s`
//! - **Traversal Composition**: `modify(modify(s, f), g) == modify(s, g . f)`

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use lambars_optics::prelude::*;
use proptest::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Clone, Debug, PartialEq)]
enum Shape {
    Circle(f64),
    Label(String),
}

// =============================================================================
// Lens Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_lens_get_put(x in any::<i32>(), y in any::<i32>()) {
        let context = Context::background();
        let x_lens = lens!(Point, x);
        let point = Point { x, y };

        let value = x_lens.get(&context, &point).unwrap().focus;
        prop_assert_eq!(x_lens.set(&context, point.clone(), value).unwrap(), point);
    }

    #[test]
    fn prop_lens_put_get(x in any::<i32>(), y in any::<i32>(), replacement in any::<i32>()) {
        let context = Context::background();
        let y_lens = lens!(Point, y);

        let updated = y_lens.set(&context, Point { x, y }, replacement).unwrap();
        prop_assert_eq!(y_lens.get(&context, &updated).unwrap().focus, replacement);
    }

    #[test]
    fn prop_lens_put_put(x in any::<i32>(), y in any::<i32>(), first in any::<i32>(), second in any::<i32>()) {
        let context = Context::background();
        let x_lens = lens!(Point, x);
        let point = Point { x, y };

        let twice = x_lens.set(&context, x_lens.set(&context, point.clone(), first).unwrap(), second).unwrap();
        prop_assert_eq!(twice, x_lens.set(&context, point, second).unwrap());
    }
}

// =============================================================================
// Prism Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_prism_preview_review(radius in -1.0e6_f64..1.0e6) {
        let context = Context::background();
        let circle = prism!(Shape, Circle);

        let reviewed = circle.reverse_get(&context, radius).unwrap();
        prop_assert_eq!(circle.foci(&context, &reviewed).unwrap(), vec![radius]);
    }

    #[test]
    fn prop_prism_skips_other_cases(text in "[a-z]{0,8}") {
        let context = Context::background();
        let circle = prism!(Shape, Circle);
        let label = Shape::Label(text);

        prop_assert_eq!(circle.length(&context, &label).unwrap(), 0);
        prop_assert_eq!(circle.set(&context, label.clone(), 1.0).unwrap(), label);
    }
}

// =============================================================================
// Iso Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_iso_round_trip(value in any::<i64>()) {
        let context = Context::background();
        let swapped = iso!(|value: i64| value.swap_bytes(), |value: i64| value.swap_bytes());

        let forward = swapped.get(&context, &value).unwrap().focus;
        prop_assert_eq!(swapped.reverse_get(&context, forward).unwrap(), value);
    }
}

// =============================================================================
// Traversal Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_vec_traversal_identity(elements in prop::collection::vec(any::<i32>(), 0..16)) {
        let context = Context::background();
        let every = VecTraversal::<i32>::new();

        prop_assert_eq!(every.modify(&context, elements.clone(), &mut |_, value| Ok(value)).unwrap(), elements);
    }

    #[test]
    fn prop_vec_traversal_composition(elements in prop::collection::vec(any::<i32>(), 0..16)) {
        let context = Context::background();
        let every = VecTraversal::<i32>::new();
        let doubled = |value: i32| value.wrapping_mul(2);
        let shifted = |value: i32| value.wrapping_add(7);

        let stepwise = every
            .modify(
                &context,
                every.modify(&context, elements.clone(), &mut |_, value| Ok(doubled(value))).unwrap(),
                &mut |_, value| Ok(shifted(value)),
            )
            .unwrap();
        let fused = every
            .modify(&context, elements, &mut |_, value| Ok(shifted(doubled(value))))
            .unwrap();
        prop_assert_eq!(stepwise, fused);
    }

    #[test]
    fn prop_map_traversal_keeps_keys(entries in prop::collection::btree_map("[a-z]{1,4}", any::<u16>(), 0..10)) {
        let context = Context::background();
        let values = MapTraversal::<String, u16>::new();

        let updated: BTreeMap<String, u16> = values
            .modify(&context, entries.clone(), &mut |_, value| Ok(value.saturating_add(1)))
            .unwrap();
        prop_assert_eq!(updated.keys().collect::<Vec<_>>(), entries.keys().collect::<Vec<_>>());

        let indices: Vec<String> = values
            .collect(&context, &entries)
            .unwrap()
            .into_iter()
            .map(|record| record.index)
            .collect();
        prop_assert_eq!(indices, entries.keys().cloned().collect::<Vec<_>>());
    }
}
