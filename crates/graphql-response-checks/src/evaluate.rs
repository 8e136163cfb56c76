use serde_json::Value;

use crate::{
    error_rules,
    outcome::Diagnostics,
    path::{Path, Resolved, Segment},
    rule::{ExpectedValue, Rule, Sentinel},
};

/// Which side of the envelope a check targets. Error rules are only
/// admissible when checking a response that is expected to carry errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckContext {
    Success,
    Errors,
}

/// Checks one rule against the whole response, appending a diagnostic for
/// every failed expectation. Returns whether the rule passed.
pub(crate) fn rule_passes(
    response: &Value,
    rule: &Rule,
    prefix: Option<&Path>,
    context: CheckContext,
    diagnostics: &mut Diagnostics,
) -> bool {
    match rule {
        Rule::Field { path, expected, negated } => data_rule_passes(
            response,
            &DataRule {
                base: BaseKind::Field,
                path,
                expected,
                negated: *negated,
                index: None,
            },
            prefix,
            context,
            diagnostics,
        ),
        Rule::Node { path, expected, negated, index } => data_rule_passes(
            response,
            &DataRule {
                base: BaseKind::Node,
                path,
                expected,
                negated: *negated,
                index: *index,
            },
            prefix,
            context,
            diagnostics,
        ),
        Rule::Edge { path, expected, negated, index } => data_rule_passes(
            response,
            &DataRule {
                base: BaseKind::Edge,
                path,
                expected,
                negated: *negated,
                index: *index,
            },
            prefix,
            context,
            diagnostics,
        ),
        Rule::ErrorPath { path } => match context {
            CheckContext::Errors => error_rules::error_path_passes(response, path, diagnostics),
            CheckContext::Success => error_rule_in_success_context(rule, diagnostics),
        },
        Rule::ErrorMessage { needle, search } => match context {
            CheckContext::Errors => {
                error_rules::error_message_passes(response, needle, *search, diagnostics)
            }
            CheckContext::Success => error_rule_in_success_context(rule, diagnostics),
        },
        Rule::OneOf { rules } => one_of_passes(response, rules, prefix, context, diagnostics),
    }
}

fn error_rule_in_success_context(rule: &Rule, diagnostics: &mut Diagnostics) -> bool {
    diagnostics.push(format!(
        "{} rules check the errors object and cannot pass in a successful response",
        rule.kind()
    ));
    false
}

fn one_of_passes(
    response: &Value,
    rules: &[Rule],
    prefix: Option<&Path>,
    context: CheckContext,
    diagnostics: &mut Diagnostics,
) -> bool {
    let mut collected = Diagnostics::default();

    for rule in rules {
        let mut branch = Diagnostics::default();
        if rule_passes(response, rule, prefix, context, &mut branch) {
            return true;
        }
        collected.append(&mut branch);
    }

    diagnostics.push(format!("none of the {} alternatives matched", rules.len()));
    diagnostics.append(&mut collected);
    false
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BaseKind {
    Field,
    Node,
    Edge,
}

impl BaseKind {
    fn list_name(self) -> &'static str {
        match self {
            BaseKind::Field => "field",
            BaseKind::Node => "node",
            BaseKind::Edge => "edge",
        }
    }
}

struct DataRule<'a> {
    base: BaseKind,
    path: &'a Path,
    expected: &'a ExpectedValue,
    negated: bool,
    index: Option<usize>,
}

fn data_rule_passes(
    response: &Value,
    rule: &DataRule<'_>,
    prefix: Option<&Path>,
    context: CheckContext,
    diagnostics: &mut Diagnostics,
) -> bool {
    // The rule path is relative to `data`, or to the caller's prefix when
    // evaluating nested rules. An explicit index extends the path.
    let mut full_path = match prefix {
        Some(prefix) => prefix.join(rule.path),
        None => Path::parse("data").join(rule.path),
    };
    if let Some(index) = rule.index {
        full_path = full_path.child(Segment::Index(index));
    }

    let resolved = full_path.resolve(response);
    tracing::debug!(path = %full_path, actual = %resolved.value(), "checking rule");

    match rule.expected {
        ExpectedValue::Sentinel(sentinel) => {
            sentinel_passes(*sentinel, resolved.value(), &full_path, rule.negated, diagnostics)
        }
        ExpectedValue::Rules(nested) => {
            nested_rules_pass(response, rule, &full_path, context, nested, diagnostics)
        }
        ExpectedValue::Value(expected) => {
            value_matches(rule, &resolved, expected, &full_path, diagnostics)
        }
    }
}

fn sentinel_passes(
    sentinel: Sentinel,
    actual: &Value,
    full_path: &Path,
    negated: bool,
    diagnostics: &mut Diagnostics,
) -> bool {
    let satisfied = match sentinel {
        Sentinel::NotNull => !actual.is_null(),
        Sentinel::IsNull => actual.is_null(),
        Sentinel::NotFalsy => !is_falsy(actual),
        Sentinel::IsFalsy => is_falsy(actual),
    };
    if satisfied != negated {
        return true;
    }

    let message = match (sentinel, negated) {
        (Sentinel::NotNull, false) => format!(r#"no data found at path "{full_path}""#),
        (Sentinel::NotNull, true) => format!(r#"unexpected data found at path "{full_path}""#),
        (Sentinel::IsNull, false) => format!(r#"expected null at path "{full_path}", got {actual}"#),
        (Sentinel::IsNull, true) => format!(r#"expected non-null data at path "{full_path}""#),
        (Sentinel::NotFalsy, false) | (Sentinel::IsFalsy, true) => {
            format!(r#"expected data at path "{full_path}" not to be falsy, got {actual}"#)
        }
        (Sentinel::NotFalsy, true) | (Sentinel::IsFalsy, false) => {
            format!(r#"expected data at path "{full_path}" to be falsy, got {actual}"#)
        }
    };
    diagnostics.push(message);
    false
}

/// Falsiness for sentinel checks: `null`, `false`, zero, the empty string,
/// the empty array and the empty object.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(boolean) => !boolean,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(string) => string.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn nested_rules_pass(
    response: &Value,
    rule: &DataRule<'_>,
    full_path: &Path,
    context: CheckContext,
    nested: &[Rule],
    diagnostics: &mut Diagnostics,
) -> bool {
    // Nested rules resolve relative to this rule's location. Without an
    // explicit index, node and edge rules fan their nested paths out over
    // every element of the list. Edges additionally descend into `node`.
    let mut next_prefix = full_path.clone();
    if rule.index.is_none() && matches!(rule.base, BaseKind::Node | BaseKind::Edge) {
        next_prefix = next_prefix.child(Segment::Any);
    }
    if rule.base == BaseKind::Edge {
        next_prefix = next_prefix.child(Segment::Key("node".to_owned()));
    }

    // Every nested rule is evaluated even after one fails, so the outcome
    // reports all broken expectations at once.
    let mut all_passed = true;
    for nested_rule in nested {
        if !rule_passes(response, nested_rule, Some(&next_prefix), context, diagnostics) {
            all_passed = false;
        }
    }
    all_passed
}

fn value_matches(
    rule: &DataRule<'_>,
    resolved: &Resolved,
    expected: &Value,
    full_path: &Path,
    diagnostics: &mut Diagnostics,
) -> bool {
    // A missing value never satisfies a positive expectation. Report it as
    // absent rather than as a mismatch.
    if resolved.value().is_null() && !rule.negated {
        diagnostics.push(format!(r#"no data found at path "{full_path}""#));
        return false;
    }

    let group_match = match rule.base {
        BaseKind::Field => resolved.is_group(),
        BaseKind::Node | BaseKind::Edge => rule.index.is_none(),
    };

    if group_match {
        if matches_any(resolved.value(), expected, rule.negated) {
            return true;
        }
        let message = if rule.negated {
            format!(
                r#"unexpected value found in {} list at path "{full_path}""#,
                rule.base.list_name()
            )
        } else {
            format!(
                r#"expected value not found in {} list at path "{full_path}""#,
                rule.base.list_name()
            )
        };
        diagnostics.push(message);
        return false;
    }

    if matches_direct(resolved.value(), expected, rule.negated) {
        return true;
    }
    let verdict = if rule.negated {
        "should not match"
    } else {
        "does not match"
    };
    diagnostics.push(format!(
        r#"value at path "{full_path}" {verdict} the expected value: expected {expected}, got {actual}"#,
        actual = resolved.value(),
    ));
    false
}

fn matches_direct(actual: &Value, expected: &Value, negated: bool) -> bool {
    if negated {
        actual != expected
    } else {
        actual == expected
    }
}

/// Any-match over the candidates of a group. Negation inverts it to "no
/// candidate matches". A group that did not expand into an array is
/// compared directly.
fn matches_any(candidates: &Value, expected: &Value, negated: bool) -> bool {
    let Value::Array(candidates) = candidates else {
        return matches_direct(candidates, expected, negated);
    };
    if negated {
        candidates.iter().all(|candidate| candidate != expected)
    } else {
        candidates.iter().any(|candidate| candidate == expected)
    }
}
