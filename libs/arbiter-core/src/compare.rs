/// Output comparison for a single test case.
///
/// Equality after stripping leading and trailing whitespace from both
/// sides. Internal whitespace is preserved, case matters, and there is no
/// numeric tolerance. Pure and total.
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    actual.trim() == expected.trim()
}
