use std::{borrow::Cow, fmt, ops::Deref};

use serde_json::Value;

use crate::{
    evaluate::{self, CheckContext},
    outcome::{CheckOutcome, Diagnostics},
    rule::Rule,
};

/// A decoded GraphQL response.
///
/// Wraps the raw JSON body and exposes the envelope checks. The wrapped
/// value is never mutated, so a response can be checked any number of times
/// with identical outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    value: Value,
}

impl Response {
    pub fn from_value(value: Value) -> Response {
        Response { value }
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// The `data` object, if present.
    pub fn data(&self) -> Option<&Value> {
        self.value.get("data")
    }

    /// The `errors` list. Empty when the response has none.
    pub fn errors(&self) -> Cow<'_, Vec<Value>> {
        self.value["errors"]
            .as_array()
            .map(Cow::Borrowed)
            .unwrap_or_else(|| Cow::Owned(Vec::new()))
    }

    /// Checks that the envelope itself is well formed: a non-empty JSON
    /// object carrying `data` or `errors`.
    pub fn check_valid(&self) -> CheckOutcome {
        let mut diagnostics = Diagnostics::default();
        self.envelope_is_valid(&mut diagnostics);
        CheckOutcome::new(diagnostics)
    }

    /// Checks that the response is well formed, carries no errors, and
    /// satisfies every rule.
    ///
    /// All rules are evaluated even after one fails, so the outcome lists
    /// every broken expectation. Rules about the `errors` object are not
    /// admissible here and fail with a diagnostic.
    pub fn check_success(&self, rules: &[Rule]) -> CheckOutcome {
        let mut diagnostics = Diagnostics::default();
        if self.success_preconditions(&mut diagnostics) {
            for rule in rules {
                evaluate::rule_passes(&self.value, rule, None, CheckContext::Success, &mut diagnostics);
            }
        }
        CheckOutcome::new(diagnostics)
    }

    /// Checks that the response is well formed, carries errors, and
    /// satisfies every rule. Error rules run against `errors`, data rules
    /// against `data`, so partial failures with partial data can be pinned
    /// down precisely.
    pub fn check_errors(&self, rules: &[Rule]) -> CheckOutcome {
        let mut diagnostics = Diagnostics::default();
        if self.error_preconditions(&mut diagnostics) {
            for rule in rules {
                evaluate::rule_passes(&self.value, rule, None, CheckContext::Errors, &mut diagnostics);
            }
        }
        CheckOutcome::new(diagnostics)
    }

    /// [`check_success`](Self::check_success) over undecoded wire rules.
    ///
    /// An invalid rule object fails with a diagnostic and the remaining
    /// rules are still checked.
    pub fn check_success_raw(&self, rules: &[Value]) -> CheckOutcome {
        let mut diagnostics = Diagnostics::default();
        if self.success_preconditions(&mut diagnostics) {
            self.check_raw_rules(rules, CheckContext::Success, &mut diagnostics);
        }
        CheckOutcome::new(diagnostics)
    }

    /// [`check_errors`](Self::check_errors) over undecoded wire rules.
    pub fn check_errors_raw(&self, rules: &[Value]) -> CheckOutcome {
        let mut diagnostics = Diagnostics::default();
        if self.error_preconditions(&mut diagnostics) {
            self.check_raw_rules(rules, CheckContext::Errors, &mut diagnostics);
        }
        CheckOutcome::new(diagnostics)
    }

    fn check_raw_rules(&self, rules: &[Value], context: CheckContext, diagnostics: &mut Diagnostics) {
        for raw in rules {
            match Rule::from_wire(raw) {
                Ok(rule) => {
                    evaluate::rule_passes(&self.value, &rule, None, context, diagnostics);
                }
                Err(error) => {
                    tracing::debug!(rule = %raw, "invalid rule object");
                    diagnostics.push(format!(
                        "invalid rule object provided for evaluation ({error}): {raw}"
                    ));
                }
            }
        }
    }

    fn envelope_is_valid(&self, diagnostics: &mut Diagnostics) -> bool {
        let map = match &self.value {
            Value::Object(map) if !map.is_empty() => map,
            Value::Object(_) | Value::Null => {
                diagnostics.push("the GraphQL response is empty".to_owned());
                return false;
            }
            other => {
                diagnostics.push(format!("the GraphQL response must be a JSON object, got: {other}"));
                return false;
            }
        };

        if !map.contains_key("data") && !map.contains_key("errors") {
            diagnostics
                .push(r#"a GraphQL response must contain a "data" or "errors" object"#.to_owned());
            return false;
        }

        true
    }

    fn has_errors_key(&self) -> bool {
        self.value.get("errors").is_some()
    }

    fn success_preconditions(&self, diagnostics: &mut Diagnostics) -> bool {
        if !self.envelope_is_valid(diagnostics) {
            return false;
        }
        if self.has_errors_key() {
            diagnostics.push(format!(
                "the response contains unexpected errors: {}",
                self.error_summary()
            ));
            return false;
        }
        true
    }

    fn error_preconditions(&self, diagnostics: &mut Diagnostics) -> bool {
        if !self.envelope_is_valid(diagnostics) {
            return false;
        }
        if !self.has_errors_key() {
            diagnostics.push("no errors object found in the response".to_owned());
            return false;
        }
        true
    }

    fn error_summary(&self) -> String {
        let errors = self.errors();
        let messages: Vec<&str> = errors
            .iter()
            .filter_map(|error| error.get("message").and_then(Value::as_str))
            .collect();
        if messages.is_empty() {
            self.value["errors"].to_string()
        } else {
            messages.join("; ")
        }
    }
}

impl From<Value> for Response {
    fn from(value: Value) -> Self {
        Response::from_value(value)
    }
}

impl Deref for Response {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self.value) {
            Ok(pretty) => f.write_str(&pretty),
            Err(_) => write!(f, "{}", self.value),
        }
    }
}

impl serde::Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Response {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Response::from)
    }
}
