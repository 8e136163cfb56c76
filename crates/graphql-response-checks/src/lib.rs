//! Declarative checks for GraphQL responses in tests.
//!
//! Build [`Rule`]s describing what a response should contain, wrap the
//! decoded body in a [`Response`] and check it:
//!
//! ```
//! use graphql_response_checks::{Response, Rule, Sentinel};
//! use serde_json::json;
//!
//! let response = Response::from_value(json!({
//!     "data": {
//!         "posts": {
//!             "nodes": [
//!                 { "id": "cG9zdDox", "title": "Hello" },
//!                 { "id": "cG9zdDoy", "title": "World" },
//!             ]
//!         }
//!     }
//! }));
//!
//! let outcome = response.check_success(&[
//!     Rule::field("posts.nodes.#.title", "Hello"),
//!     Rule::node("posts.nodes", [Rule::field("id", Sentinel::NotNull)]),
//! ]);
//! assert!(outcome.passed());
//! ```
//!
//! A failing check never panics and never stops early. Every broken
//! expectation ends up in the outcome's [`Diagnostics`], so one run of a
//! test tells the whole story. The panicking [`assert_query_successful`]
//! and [`assert_query_error`] helpers are a thin layer on top.

mod assert;
mod error_rules;
mod evaluate;
mod outcome;
mod path;
mod response;
mod rule;

pub use self::{
    assert::{assert_query_error, assert_query_successful, assert_response_is_valid},
    outcome::{CheckOutcome, Diagnostics},
    path::{Path, Resolved, Segment},
    response::Response,
    rule::{ExpectedValue, MessageSearch, Rule, RuleError, Sentinel},
};

/// Encodes a Relay global id: base64 of `"{type_name}:{id}"`.
///
/// ```
/// assert_eq!(graphql_response_checks::relay_id("post", 6), "cG9zdDo2");
/// ```
pub fn relay_id(type_name: &str, id: impl std::fmt::Display) -> String {
    use base64::{engine::general_purpose, Engine as _};

    general_purpose::STANDARD.encode(format!("{type_name}:{id}"))
}

/// Decodes a Relay global id back into its type name and id. Returns
/// `None` when the input is not base64 or not of the `"type:id"` form.
pub fn decode_relay_id(relay_id: &str) -> Option<(String, String)> {
    use base64::{engine::general_purpose, Engine as _};

    let decoded = general_purpose::STANDARD.decode(relay_id).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (type_name, id) = decoded.split_once(':')?;
    Some((type_name.to_owned(), id.to_owned()))
}
