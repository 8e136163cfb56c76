/// Errors from driving a GraphQL endpoint in tests.
///
/// These cover configuration and transport problems only. A response that
/// decodes but does not satisfy the expectations is a failed check, not an
/// error.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("the operation has an empty query")]
    EmptyQuery,
    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response status {status}: {body}")]
    UnexpectedStatus {
        status: http::StatusCode,
        body: String,
    },
    #[error("the response body is empty")]
    EmptyBody,
    #[error("the response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of batched responses, got: {0}")]
    MalformedBatch(serde_json::Value),
}
