//! An async GraphQL client for integration tests.
//!
//! [`TestClient`] drives a GraphQL endpoint over HTTP: single operations
//! via POST or GET, batches in one request, and staggered concurrent runs.
//! Responses come back as [`Response`] values ready for the declarative
//! checks in [`graphql_response_checks`].
//!
//! ```no_run
//! # async fn example() -> Result<(), graphql_test_client::ClientError> {
//! use graphql_test_client::{Rule, TestClient};
//!
//! let client = TestClient::builder("http://localhost:8080/graphql")
//!     .auth_header("Authorization", "Bearer test-token")
//!     .build()?;
//!
//! let response = client
//!     .post("query GetPosts { posts { nodes { title } } }")
//!     .await?;
//!
//! response
//!     .check_success(&[Rule::field("posts.nodes.#.title", "Hello world")])
//!     .into_result()
//!     .unwrap();
//! # Ok(())
//! # }
//! ```

#![allow(unused_crate_dependencies)]

mod client;
mod error;
mod operation;
mod request;

pub use self::{
    client::{ClientBuilder, TestClient},
    error::ClientError,
    operation::Operation,
    request::TestRequest,
};

pub use graphql_response_checks::{CheckOutcome, Diagnostics, Response, Rule, Sentinel};
