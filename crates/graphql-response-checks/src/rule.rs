use serde_json::{Map, Value};

use crate::path::Path;

/// Marker values that replace literal comparison with a presence or
/// falsiness check.
///
/// On the wire they travel as reserved strings in `expected_value`,
/// namespaced so they cannot collide with real field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// Passes when the value at the path is not `null`.
    NotNull,
    /// Passes when the value at the path is `null` or absent.
    IsNull,
    /// Passes when the value at the path is not falsy.
    NotFalsy,
    /// Passes when the value at the path is falsy: `null`, `false`, zero,
    /// an empty string, an empty array or an empty object.
    IsFalsy,
}

impl Sentinel {
    pub const NOT_NULL: &'static str = "response_checks_field_value_not_null";
    pub const IS_NULL: &'static str = "response_checks_field_value_is_null";
    pub const NOT_FALSY: &'static str = "response_checks_field_value_not_falsy";
    pub const IS_FALSY: &'static str = "response_checks_field_value_is_falsy";

    /// The reserved wire string for this sentinel.
    pub fn as_str(self) -> &'static str {
        match self {
            Sentinel::NotNull => Self::NOT_NULL,
            Sentinel::IsNull => Self::IS_NULL,
            Sentinel::NotFalsy => Self::NOT_FALSY,
            Sentinel::IsFalsy => Self::IS_FALSY,
        }
    }

    pub fn from_marker(marker: &str) -> Option<Sentinel> {
        match marker {
            Self::NOT_NULL => Some(Sentinel::NotNull),
            Self::IS_NULL => Some(Sentinel::IsNull),
            Self::NOT_FALSY => Some(Sentinel::NotFalsy),
            Self::IS_FALSY => Some(Sentinel::IsFalsy),
            _ => None,
        }
    }
}

/// How an error message rule compares its needle against `errors[].message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageSearch {
    #[default]
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

impl MessageSearch {
    /// The stable wire code for this search mode.
    pub fn code(self) -> u64 {
        match self {
            MessageSearch::Equals => 100,
            MessageSearch::Contains => 200,
            MessageSearch::StartsWith => 300,
            MessageSearch::EndsWith => 400,
        }
    }

    pub fn from_code(code: u64) -> Option<MessageSearch> {
        match code {
            100 => Some(MessageSearch::Equals),
            200 => Some(MessageSearch::Contains),
            300 => Some(MessageSearch::StartsWith),
            400 => Some(MessageSearch::EndsWith),
            _ => None,
        }
    }

    pub(crate) fn matches(self, haystack: &str, needle: &str) -> bool {
        match self {
            MessageSearch::Equals => haystack == needle,
            MessageSearch::Contains => haystack.contains(needle),
            MessageSearch::StartsWith => haystack.starts_with(needle),
            MessageSearch::EndsWith => haystack.ends_with(needle),
        }
    }

    /// Human wording used in diagnostics.
    pub(crate) fn describe(self) -> &'static str {
        match self {
            MessageSearch::Equals => "equals",
            MessageSearch::Contains => "contains",
            MessageSearch::StartsWith => "starts with",
            MessageSearch::EndsWith => "ends with",
        }
    }
}

/// What a data rule expects to find at its path.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedValue {
    /// A literal JSON value, compared for equality.
    Value(Value),
    /// A presence or falsiness check instead of a literal comparison.
    Sentinel(Sentinel),
    /// Nested rules evaluated relative to the value at the path.
    Rules(Vec<Rule>),
}

impl From<Value> for ExpectedValue {
    fn from(value: Value) -> Self {
        ExpectedValue::Value(value)
    }
}

impl From<Sentinel> for ExpectedValue {
    fn from(sentinel: Sentinel) -> Self {
        ExpectedValue::Sentinel(sentinel)
    }
}

impl From<Vec<Rule>> for ExpectedValue {
    fn from(rules: Vec<Rule>) -> Self {
        ExpectedValue::Rules(rules)
    }
}

impl<const N: usize> From<[Rule; N]> for ExpectedValue {
    fn from(rules: [Rule; N]) -> Self {
        ExpectedValue::Rules(rules.into())
    }
}

impl From<&str> for ExpectedValue {
    fn from(value: &str) -> Self {
        ExpectedValue::Value(Value::String(value.to_owned()))
    }
}

impl From<String> for ExpectedValue {
    fn from(value: String) -> Self {
        ExpectedValue::Value(Value::String(value))
    }
}

impl From<bool> for ExpectedValue {
    fn from(value: bool) -> Self {
        ExpectedValue::Value(Value::Bool(value))
    }
}

impl From<i32> for ExpectedValue {
    fn from(value: i32) -> Self {
        ExpectedValue::Value(value.into())
    }
}

impl From<i64> for ExpectedValue {
    fn from(value: i64) -> Self {
        ExpectedValue::Value(value.into())
    }
}

impl From<u64> for ExpectedValue {
    fn from(value: u64) -> Self {
        ExpectedValue::Value(value.into())
    }
}

impl From<f64> for ExpectedValue {
    fn from(value: f64) -> Self {
        ExpectedValue::Value(value.into())
    }
}

/// A declarative expectation about a GraphQL response.
///
/// Build rules with the constructors and hand them to
/// [`Response::check_success`](crate::Response::check_success) or
/// [`Response::check_errors`](crate::Response::check_errors). Rules also
/// have a JSON wire shape, decoded with [`Rule::from_wire`]:
///
/// ```json
/// { "kind": "NODE", "path": "posts.nodes", "expected_value": [...], "expected_index": 0 }
/// ```
///
/// A `!` prefix on the kind inverts data rules. Error rules and `ONE_OF`
/// have no negated form.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Compares the value at a path under `data`. With a wildcard path the
    /// comparison passes when any candidate matches.
    Field {
        path: Path,
        expected: ExpectedValue,
        negated: bool,
    },
    /// An expectation about a connection's `nodes` list.
    Node {
        path: Path,
        expected: ExpectedValue,
        negated: bool,
        index: Option<usize>,
    },
    /// An expectation about a connection's `edges` list. Nested rules
    /// descend into each edge's `node`.
    Edge {
        path: Path,
        expected: ExpectedValue,
        negated: bool,
        index: Option<usize>,
    },
    /// Passes when some `errors[].path` equals the given path exactly.
    ErrorPath { path: Path },
    /// Passes when some `errors[].message` matches the needle.
    ErrorMessage { needle: String, search: MessageSearch },
    /// Passes when at least one of the alternatives passes.
    OneOf { rules: Vec<Rule> },
}

impl Rule {
    /// Expects the value at `path` to match.
    pub fn field(path: impl Into<Path>, expected: impl Into<ExpectedValue>) -> Rule {
        Rule::Field {
            path: path.into(),
            expected: expected.into(),
            negated: false,
        }
    }

    /// Alias of [`Rule::field`] kept for the `OBJECT` wire kind.
    pub fn object(path: impl Into<Path>, expected: impl Into<ExpectedValue>) -> Rule {
        Rule::field(path, expected)
    }

    /// Expects a match in the `nodes` list of the connection at `path`.
    pub fn node(path: impl Into<Path>, expected: impl Into<ExpectedValue>) -> Rule {
        Rule::Node {
            path: path.into(),
            expected: expected.into(),
            negated: false,
            index: None,
        }
    }

    /// Expects a match in the `edges` list of the connection at `path`.
    pub fn edge(path: impl Into<Path>, expected: impl Into<ExpectedValue>) -> Rule {
        Rule::Edge {
            path: path.into(),
            expected: expected.into(),
            negated: false,
            index: None,
        }
    }

    /// Expects an error whose `path` equals the given path exactly.
    pub fn error_path(path: impl Into<Path>) -> Rule {
        Rule::ErrorPath { path: path.into() }
    }

    /// Expects an error whose `message` matches `needle` under the given
    /// search mode.
    pub fn error_message(needle: impl Into<String>, search: MessageSearch) -> Rule {
        Rule::ErrorMessage {
            needle: needle.into(),
            search,
        }
    }

    /// Passes when at least one of the alternatives passes.
    pub fn one_of(rules: impl IntoIterator<Item = Rule>) -> Rule {
        Rule::OneOf {
            rules: rules.into_iter().collect(),
        }
    }

    /// Inverts the pass condition. Only data rules have a negated form;
    /// error rules and alternatives are returned unchanged.
    pub fn not(mut self) -> Rule {
        match &mut self {
            Rule::Field { negated, .. } | Rule::Node { negated, .. } | Rule::Edge { negated, .. } => {
                *negated = !*negated;
            }
            Rule::ErrorPath { .. } | Rule::ErrorMessage { .. } | Rule::OneOf { .. } => {}
        }
        self
    }

    /// Pins a node or edge rule to one explicit position in its list
    /// instead of matching against the whole group. Other rules are
    /// returned unchanged.
    pub fn at(mut self, position: usize) -> Rule {
        if let Rule::Node { index, .. } | Rule::Edge { index, .. } = &mut self {
            *index = Some(position);
        }
        self
    }

    /// The wire kind, with the `!` prefix when the rule is negated.
    pub fn kind(&self) -> String {
        let (base, negated) = match self {
            Rule::Field { negated, .. } => ("FIELD", *negated),
            Rule::Node { negated, .. } => ("NODE", *negated),
            Rule::Edge { negated, .. } => ("EDGE", *negated),
            Rule::ErrorPath { .. } => ("ERROR_PATH", false),
            Rule::ErrorMessage { .. } => ("ERROR_MESSAGE", false),
            Rule::OneOf { .. } => ("ONE_OF", false),
        };
        if negated {
            format!("!{base}")
        } else {
            base.to_owned()
        }
    }

    /// Whether this rule checks the `errors` side of the envelope.
    pub fn is_error_rule(&self) -> bool {
        matches!(self, Rule::ErrorPath { .. } | Rule::ErrorMessage { .. })
    }

    /// Decodes a rule from its JSON wire shape, validating that the fields
    /// required by its kind are present and well typed.
    pub fn from_wire(value: &Value) -> Result<Rule, RuleError> {
        let Value::Object(map) = value else {
            return Err(RuleError::NotAnObject(value.clone()));
        };

        let kind = match map.get("kind") {
            Some(Value::String(kind)) if !kind.is_empty() => kind.as_str(),
            _ => return Err(RuleError::MissingKind),
        };

        let (base, negated) = match kind.strip_prefix('!') {
            Some(base) => (base, true),
            None => (kind, false),
        };

        match base {
            "FIELD" | "OBJECT" => Ok(Rule::Field {
                path: required_path(map, kind)?,
                expected: decode_expected(map.get("expected_value"))?,
                negated,
            }),
            "NODE" => Ok(Rule::Node {
                path: required_path(map, kind)?,
                expected: decode_expected(map.get("expected_value"))?,
                negated,
                index: decode_index(map)?,
            }),
            "EDGE" => Ok(Rule::Edge {
                path: required_path(map, kind)?,
                expected: decode_expected(map.get("expected_value"))?,
                negated,
                index: decode_index(map)?,
            }),
            "ERROR_PATH" => {
                if negated {
                    return Err(RuleError::InvalidNegation(base.to_owned()));
                }
                Ok(Rule::ErrorPath {
                    path: required_path(map, kind)?,
                })
            }
            "ERROR_MESSAGE" => {
                if negated {
                    return Err(RuleError::InvalidNegation(base.to_owned()));
                }
                let needle = match map.get("needle") {
                    Some(Value::String(needle)) => needle.clone(),
                    _ => {
                        return Err(RuleError::MissingField {
                            kind: kind.to_owned(),
                            field: "needle",
                        })
                    }
                };
                let search = match map.get("search_type") {
                    None | Some(Value::Null) => MessageSearch::default(),
                    Some(Value::Number(number)) => number
                        .as_u64()
                        .and_then(MessageSearch::from_code)
                        .ok_or_else(|| RuleError::InvalidSearchCode(Value::Number(number.clone())))?,
                    Some(other) => return Err(RuleError::InvalidSearchCode(other.clone())),
                };
                Ok(Rule::ErrorMessage { needle, search })
            }
            "ONE_OF" => {
                if negated {
                    return Err(RuleError::InvalidNegation(base.to_owned()));
                }
                let Some(Value::Array(raw_rules)) = map.get("rules") else {
                    return Err(RuleError::MissingField {
                        kind: kind.to_owned(),
                        field: "rules",
                    });
                };
                let rules = raw_rules.iter().map(Rule::from_wire).collect::<Result<_, _>>()?;
                Ok(Rule::OneOf { rules })
            }
            _ => Err(RuleError::UnknownKind(kind.to_owned())),
        }
    }

    /// Encodes this rule into its JSON wire shape.
    pub fn to_wire(&self) -> Value {
        let mut wire = Map::new();
        wire.insert("kind".to_owned(), Value::String(self.kind()));

        match self {
            Rule::Field { path, expected, .. } => {
                wire.insert("path".to_owned(), Value::String(path.to_string()));
                wire.insert("expected_value".to_owned(), encode_expected(expected));
            }
            Rule::Node { path, expected, index, .. } | Rule::Edge { path, expected, index, .. } => {
                wire.insert("path".to_owned(), Value::String(path.to_string()));
                wire.insert("expected_value".to_owned(), encode_expected(expected));
                if let Some(index) = index {
                    wire.insert("expected_index".to_owned(), Value::from(*index));
                }
            }
            Rule::ErrorPath { path } => {
                wire.insert("path".to_owned(), Value::String(path.to_string()));
            }
            Rule::ErrorMessage { needle, search } => {
                wire.insert("needle".to_owned(), Value::String(needle.clone()));
                wire.insert("search_type".to_owned(), Value::from(search.code()));
            }
            Rule::OneOf { rules } => {
                wire.insert(
                    "rules".to_owned(),
                    Value::Array(rules.iter().map(Rule::to_wire).collect()),
                );
            }
        }

        Value::Object(wire)
    }
}

impl serde::Serialize for Rule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Rule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Rule::from_wire(&value).map_err(serde::de::Error::custom)
    }
}

fn required_path(map: &Map<String, Value>, kind: &str) -> Result<Path, RuleError> {
    match map.get("path") {
        Some(Value::String(path)) => Ok(Path::parse(path)),
        _ => Err(RuleError::MissingField {
            kind: kind.to_owned(),
            field: "path",
        }),
    }
}

fn decode_expected(value: Option<&Value>) -> Result<ExpectedValue, RuleError> {
    match value {
        // An omitted expectation only asks for the field to be there.
        None | Some(Value::Null) => Ok(ExpectedValue::Sentinel(Sentinel::NotNull)),
        Some(Value::String(marker)) => Ok(match Sentinel::from_marker(marker) {
            Some(sentinel) => ExpectedValue::Sentinel(sentinel),
            None => ExpectedValue::Value(Value::String(marker.clone())),
        }),
        Some(Value::Array(items)) if looks_like_rules(items) => {
            let rules = items.iter().map(Rule::from_wire).collect::<Result<_, _>>()?;
            Ok(ExpectedValue::Rules(rules))
        }
        Some(other) => Ok(ExpectedValue::Value(other.clone())),
    }
}

fn looks_like_rules(items: &[Value]) -> bool {
    items
        .first()
        .and_then(Value::as_object)
        .is_some_and(|first| first.contains_key("kind"))
}

fn decode_index(map: &Map<String, Value>) -> Result<Option<usize>, RuleError> {
    match map.get("expected_index") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => match number.as_u64() {
            Some(index) => Ok(Some(index as usize)),
            None => Err(RuleError::InvalidIndex(Value::Number(number.clone()))),
        },
        Some(other) => Err(RuleError::InvalidIndex(other.clone())),
    }
}

fn encode_expected(expected: &ExpectedValue) -> Value {
    match expected {
        ExpectedValue::Value(value) => value.clone(),
        ExpectedValue::Sentinel(sentinel) => Value::String(sentinel.as_str().to_owned()),
        ExpectedValue::Rules(rules) => Value::Array(rules.iter().map(Rule::to_wire).collect()),
    }
}

/// A structurally invalid wire rule.
///
/// Only decoding returns errors. Data shape mismatches during evaluation
/// are reported as diagnostics instead.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("rule must be a JSON object, got: {0}")]
    NotAnObject(Value),
    #[error("rule is missing its kind")]
    MissingKind,
    #[error("unknown rule kind: {0:?}")]
    UnknownKind(String),
    #[error("{kind} rule is missing its {field}")]
    MissingField { kind: String, field: &'static str },
    #[error("negation is not supported for {0} rules")]
    InvalidNegation(String),
    #[error("invalid search_type: {0}")]
    InvalidSearchCode(Value),
    #[error("expected_index must be a non-negative integer, got: {0}")]
    InvalidIndex(Value),
}
