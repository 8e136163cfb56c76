use graphql_response_checks::{Response, Rule, Sentinel};
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn wire_rules(raw: &str) -> Vec<Value> {
    serde_json::from_str(raw).unwrap()
}

fn posts_response() -> Response {
    Response::from_value(json!({
        "data": {
            "posts": {
                "nodes": [
                    { "title": "Hello world", "status": "PUBLISH" },
                    { "title": "Second post", "status": "DRAFT" },
                ]
            }
        }
    }))
}

#[test]
fn wire_rules_drive_a_success_check() {
    let rules = wire_rules(indoc! {r##"
        [
            { "kind": "FIELD", "path": "posts.nodes.#.title", "expected_value": "Hello world" },
            { "kind": "!FIELD", "path": "posts.nodes.#.title", "expected_value": "No such post" },
            {
                "kind": "NODE",
                "path": "posts.nodes",
                "expected_value": [
                    { "kind": "FIELD", "path": "status", "expected_value": "DRAFT" }
                ],
                "expected_index": 1
            }
        ]
    "##});

    let outcome = posts_response().check_success_raw(&rules);
    assert!(outcome.passed(), "{}", outcome.describe_failure());
}

#[test]
fn an_invalid_wire_rule_does_not_stop_the_remaining_rules() {
    let rules = wire_rules(indoc! {r##"
        [
            { "kind": "TYPO", "path": "posts" },
            { "kind": "FIELD", "path": "posts.nodes.0.title", "expected_value": "Wrong title" }
        ]
    "##});

    let outcome = posts_response().check_success_raw(&rules);
    let messages: Vec<_> = outcome.diagnostics().iter_messages().collect();

    assert_eq!(messages.len(), 2);
    assert!(
        messages[0].starts_with("invalid rule object provided for evaluation"),
        "{:?}",
        messages[0]
    );
    assert!(messages[1].contains(r#"value at path "data.posts.nodes.0.title""#));
}

#[test]
fn wire_rules_drive_an_error_check() {
    let response = Response::from_value(json!({
        "data": { "post": null },
        "errors": [{ "message": "Internal server error", "path": ["post"] }],
    }));

    let rules = wire_rules(indoc! {r#"
        [
            { "kind": "ERROR_PATH", "path": "post" },
            { "kind": "ERROR_MESSAGE", "needle": "server error", "search_type": 400 },
            { "kind": "FIELD", "path": "post", "expected_value": "response_checks_field_value_is_null" }
        ]
    "#});

    let outcome = response.check_errors_raw(&rules);
    assert!(outcome.passed(), "{}", outcome.describe_failure());
}

#[test]
fn one_of_on_the_wire_takes_a_rules_array() {
    let rules = wire_rules(indoc! {r##"
        [
            {
                "kind": "ONE_OF",
                "rules": [
                    { "kind": "FIELD", "path": "posts.nodes.#.status", "expected_value": "TRASH" },
                    { "kind": "FIELD", "path": "posts.nodes.#.status", "expected_value": "DRAFT" }
                ]
            }
        ]
    "##});

    let outcome = posts_response().check_success_raw(&rules);
    assert!(outcome.passed(), "{}", outcome.describe_failure());
}

#[test]
fn decoded_and_raw_checks_agree() {
    let rules = [
        Rule::field("posts.nodes.#.title", "Hello world"),
        Rule::node("posts.nodes", [Rule::field("status", Sentinel::NotFalsy)]),
        Rule::field("posts.missing", "anything"),
    ];
    let raw: Vec<Value> = rules.iter().map(Rule::to_wire).collect();

    let response = posts_response();
    let decoded = response.check_success(&rules);
    let from_wire = response.check_success_raw(&raw);

    assert_eq!(
        decoded.diagnostics().iter_messages().collect::<Vec<_>>(),
        from_wire.diagnostics().iter_messages().collect::<Vec<_>>(),
    );
}
