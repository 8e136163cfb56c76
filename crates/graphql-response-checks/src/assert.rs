//! Panicking assertion helpers for use inside tests.

#![allow(clippy::panic)]

use crate::{response::Response, rule::Rule};

/// Asserts that the response envelope is well formed.
///
/// # Panics
///
/// Panics with the full list of diagnostics and the pretty printed
/// response when validation fails.
pub fn assert_response_is_valid(response: &Response) {
    let outcome = response.check_valid();
    if outcome.is_failure() {
        panic!("{}\nResponse:\n{response}", outcome.describe_failure());
    }
}

/// Asserts a successful response satisfying every rule.
pub fn assert_query_successful(response: &Response, rules: &[Rule]) {
    let outcome = response.check_success(rules);
    if outcome.is_failure() {
        panic!("{}\nResponse:\n{response}", outcome.describe_failure());
    }
}

/// Asserts an error response satisfying every rule.
pub fn assert_query_error(response: &Response, rules: &[Rule]) {
    let outcome = response.check_errors(rules);
    if outcome.is_failure() {
        panic!("{}\nResponse:\n{response}", outcome.describe_failure());
    }
}
