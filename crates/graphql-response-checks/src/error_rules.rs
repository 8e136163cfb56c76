use serde_json::Value;

use crate::{
    outcome::Diagnostics,
    path::{Path, Segment},
    rule::MessageSearch,
};

/// Passes when some entry of `errors` has a `path` equal to the given path.
///
/// The comparison is exact and strict: numeric segments only match JSON
/// numbers and keys only match JSON strings, with no partial prefixes.
pub(crate) fn error_path_passes(response: &Value, path: &Path, diagnostics: &mut Diagnostics) -> bool {
    let target: Vec<Value> = path
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Key(key) => Value::String(key.clone()),
            Segment::Index(index) => Value::from(*index),
            Segment::Any => Value::String("#".to_owned()),
        })
        .collect();

    tracing::debug!(path = %path, "searching error paths");

    for error in errors(response) {
        match error.get("path") {
            Some(Value::Array(error_path)) if *error_path == target => return true,
            _ => {}
        }
    }

    diagnostics.push(format!(r#"no errors found that occurred at path "{path}""#));
    false
}

/// Passes when some entry of `errors` has a `message` matching the needle
/// under the given search mode.
pub(crate) fn error_message_passes(
    response: &Value,
    needle: &str,
    search: MessageSearch,
    diagnostics: &mut Diagnostics,
) -> bool {
    tracing::debug!(needle, mode = search.describe(), "searching error messages");

    for error in errors(response) {
        if let Some(Value::String(message)) = error.get("message") {
            if search.matches(message, needle) {
                return true;
            }
        }
    }

    diagnostics.push(format!(
        r#"no errors found with a message that {} "{needle}""#,
        search.describe()
    ));
    false
}

fn errors(response: &Value) -> impl Iterator<Item = &Value> {
    response
        .get("errors")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}
