use std::future::IntoFuture;

use futures::future::BoxFuture;
use graphql_response_checks::Response;
use serde_json::Value;

use crate::{client::TestClient, error::ClientError, operation::Operation};

/// A request under construction. Awaiting it sends the operation and
/// decodes the body into a [`Response`]; [`send_raw`](Self::send_raw)
/// skips the decoding.
#[must_use]
pub struct TestRequest {
    client: TestClient,
    method: http::Method,
    operation: Operation,
    headers: Vec<(String, String)>,
    use_auth: bool,
}

impl TestRequest {
    pub(crate) fn new(client: TestClient, method: http::Method, operation: Operation) -> TestRequest {
        TestRequest {
            client,
            method,
            operation,
            headers: Vec::new(),
            use_auth: true,
        }
    }

    /// Adds a header to this request only. Overrides the client's auth
    /// header when the names collide.
    pub fn header(mut self, name: &str, value: &str) -> TestRequest {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Attaches variables to the operation, replacing any previous ones.
    pub fn variables(mut self, variables: impl serde::Serialize) -> TestRequest {
        self.operation = self.operation.variables(variables);
        self
    }

    /// Names the operation to execute when the document contains several.
    pub fn operation_name(mut self, name: &str) -> TestRequest {
        self.operation = self.operation.operation_name(name);
        self
    }

    /// Sends this request without the client's auth header, regardless of
    /// how the client was configured.
    pub fn without_auth(mut self) -> TestRequest {
        self.use_auth = false;
        self
    }

    /// Sends the request and hands back the raw transport response,
    /// undecoded. Status and body checks are the caller's business.
    pub async fn send_raw(self) -> Result<reqwest::Response, ClientError> {
        if self.operation.query.trim().is_empty() {
            return Err(ClientError::EmptyQuery);
        }

        let TestRequest {
            client,
            method,
            operation,
            headers,
            use_auth,
        } = self;

        let mut header_map = http::HeaderMap::new();
        if use_auth {
            if let Some((name, value)) = client.auth_header.clone() {
                header_map.insert(name, value);
            }
        }
        for (name, value) in headers {
            header_map.insert(
                http::HeaderName::from_bytes(name.as_bytes())?,
                http::HeaderValue::from_str(&value)?,
            );
        }

        tracing::debug!(%method, query = %operation.query, "sending GraphQL request");

        let request = if method == http::Method::GET {
            let mut endpoint = client.endpoint.clone();
            {
                let mut pairs = endpoint.query_pairs_mut();
                pairs.append_pair("query", &operation.query);
                if let Some(variables) = &operation.variables {
                    pairs.append_pair("variables", &variables.to_string());
                }
                if let Some(name) = &operation.operation_name {
                    pairs.append_pair("operationName", name);
                }
            }
            client.http.get(endpoint)
        } else {
            client.http.post(client.endpoint.clone()).json(&operation)
        };

        Ok(request.headers(header_map).send().await?)
    }
}

impl IntoFuture for TestRequest {
    type Output = Result<Response, ClientError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let response = self.send_raw().await?;
            Ok(Response::from_value(decode_body(response).await?))
        })
    }
}

/// Decodes a transport response, insisting on a 200 status, a non-empty
/// body and valid JSON.
pub(crate) async fn decode_body(response: reqwest::Response) -> Result<Value, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    if status != http::StatusCode::OK {
        return Err(ClientError::UnexpectedStatus { status, body });
    }
    if body.trim().is_empty() {
        return Err(ClientError::EmptyBody);
    }

    Ok(serde_json::from_str(&body)?)
}
