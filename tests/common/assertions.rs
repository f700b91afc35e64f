//! Assertion macros for the observable view-model fields.
//!
//! They wrap `pretty_assertions` and name the field that went wrong, so a
//! failure reads as "results" or "in-flight" rather than a bare diff.

/// Assert the exact result sequence of a view-model.
///
/// ```rust
/// assert_results!(vm, ["Porsche 911", "Porsche Cayenne"]);
/// ```
#[macro_export]
macro_rules! assert_results {
    ($vm:expr, [$($item:expr),* $(,)?]) => {{
        let expected: Vec<String> = vec![$($item.to_string()),*];
        let actual = $vm.results();
        pretty_assertions::assert_eq!(actual, expected, "view-model results");
    }};
}

/// Assert the in-flight flag of a view-model.
#[macro_export]
macro_rules! assert_in_flight {
    ($vm:expr, $expected:expr) => {{
        let actual = $vm.is_request_in_flight();
        assert_eq!(
            actual, $expected,
            "is_request_in_flight: expected {}, got {}",
            $expected, actual
        );
    }};
}
