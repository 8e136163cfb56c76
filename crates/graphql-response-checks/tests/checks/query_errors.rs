use graphql_response_checks::{MessageSearch, Response, Rule, Sentinel};
use pretty_assertions::assert_eq;
use serde_json::json;

fn partial_failure_response() -> Response {
    Response::from_value(json!({
        "data": {
            "post": {
                "title": "Hello world",
                "restrictedField": null,
            }
        },
        "errors": [
            {
                "message": "Sorry, you are not allowed to see restrictedField",
                "path": ["post", "restrictedField"],
                "locations": [{ "line": 4, "column": 9 }],
            },
            {
                "message": "Internal server error",
                "path": ["post", "previewNode", 0],
            },
        ]
    }))
}

#[test]
fn a_response_without_errors_cannot_pass_an_error_check() {
    let response = Response::from_value(json!({ "data": { "post": null } }));

    let outcome = response.check_errors(&[]);
    assert_eq!(
        outcome.diagnostics().iter_messages().collect::<Vec<_>>(),
        ["no errors object found in the response"],
    );
}

#[test]
fn error_paths_match_exactly() {
    let response = partial_failure_response();

    assert!(response
        .check_errors(&[Rule::error_path("post.restrictedField")])
        .passed());
    assert!(response
        .check_errors(&[Rule::error_path("post.previewNode.0")])
        .passed());

    let outcome = response.check_errors(&[Rule::error_path("post")]);
    assert_eq!(
        outcome.diagnostics().iter_messages().collect::<Vec<_>>(),
        [r#"no errors found that occurred at path "post""#],
    );
}

#[test]
fn error_messages_match_under_each_search_mode() {
    let response = partial_failure_response();

    let outcome = response.check_errors(&[
        Rule::error_message("Internal server error", MessageSearch::Equals),
        Rule::error_message("not allowed", MessageSearch::Contains),
        Rule::error_message("Sorry,", MessageSearch::StartsWith),
        Rule::error_message("restrictedField", MessageSearch::EndsWith),
    ]);

    assert!(outcome.passed(), "{}", outcome.describe_failure());
}

#[test]
fn a_missed_message_names_the_search_mode() {
    let outcome = partial_failure_response()
        .check_errors(&[Rule::error_message("unrelated", MessageSearch::StartsWith)]);

    assert_eq!(
        outcome.diagnostics().iter_messages().collect::<Vec<_>>(),
        [r#"no errors found with a message that starts with "unrelated""#],
    );
}

#[test]
fn data_rules_still_run_against_partial_data() {
    let outcome = partial_failure_response().check_errors(&[
        Rule::error_path("post.restrictedField"),
        Rule::field("post.title", "Hello world"),
        Rule::field("post.restrictedField", Sentinel::IsNull),
    ]);

    assert!(outcome.passed(), "{}", outcome.describe_failure());
}

#[test]
fn every_failing_rule_is_reported_together() {
    let outcome = partial_failure_response().check_errors(&[
        Rule::error_path("wrong.path"),
        Rule::error_message("unrelated", MessageSearch::Equals),
        Rule::field("post.title", "Wrong title"),
    ]);

    assert_eq!(
        outcome.diagnostics().iter_messages().collect::<Vec<_>>(),
        [
            r#"no errors found that occurred at path "wrong.path""#,
            r#"no errors found with a message that equals "unrelated""#,
            r#"value at path "data.post.title" does not match the expected value: expected "Wrong title", got "Hello world""#,
        ],
    );
}

#[test]
fn one_of_works_over_error_rules_too() {
    let outcome = partial_failure_response().check_errors(&[Rule::one_of([
        Rule::error_message("No such message", MessageSearch::Equals),
        Rule::error_path("post.restrictedField"),
    ])]);

    assert!(outcome.passed(), "{}", outcome.describe_failure());
}

#[test]
fn a_nulled_out_field_with_errors_fails_success_but_passes_error_checks() {
    let response = Response::from_value(json!({
        "data": { "post": null },
        "errors": [{ "message": "Not found", "path": ["post"] }],
    }));

    assert!(response
        .check_errors(&[
            Rule::error_path("post"),
            Rule::error_message("Not found", MessageSearch::Equals),
            Rule::field("post", Sentinel::IsNull),
        ])
        .passed());

    let outcome = response.check_success(&[]);
    assert_eq!(
        outcome.diagnostics().iter_messages().collect::<Vec<_>>(),
        ["the response contains unexpected errors: Not found"],
    );
}

#[test]
fn malformed_bodies_fail_before_any_rule_runs() {
    let response = Response::from_value(json!("not an object"));

    let outcome = response.check_errors(&[Rule::error_path("post")]);
    assert_eq!(
        outcome.diagnostics().iter_messages().collect::<Vec<_>>(),
        [r#"the GraphQL response must be a JSON object, got: "not an object""#],
    );
}
