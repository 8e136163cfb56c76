use std::time::Duration;

use graphql_response_checks::Response;
use serde_json::Value;
use url::Url;

use crate::{
    error::ClientError,
    operation::Operation,
    request::{decode_body, TestRequest},
};

/// An async client for exercising a GraphQL endpoint from tests.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// ```no_run
/// # async fn example() -> Result<(), graphql_test_client::ClientError> {
/// use graphql_test_client::TestClient;
///
/// let client = TestClient::new("http://localhost:8080/graphql")?;
/// let response = client.post("{ posts { nodes { title } } }").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestClient {
    pub(crate) http: reqwest::Client,
    pub(crate) endpoint: Url,
    pub(crate) auth_header: Option<(http::HeaderName, http::HeaderValue)>,
    stagger: Duration,
    concurrency_limit: usize,
}

impl TestClient {
    /// A client for the given endpoint with default settings.
    pub fn new(endpoint: &str) -> Result<TestClient, ClientError> {
        Self::builder(endpoint).build()
    }

    pub fn builder(endpoint: &str) -> ClientBuilder {
        ClientBuilder::new(endpoint)
    }

    /// Prepares a POST request for the operation. Await the returned
    /// request to send it.
    pub fn post(&self, operation: impl Into<Operation>) -> TestRequest {
        TestRequest::new(self.clone(), http::Method::POST, operation.into())
    }

    /// Prepares a GET request with the operation encoded in the url's query
    /// string.
    pub fn get(&self, operation: impl Into<Operation>) -> TestRequest {
        TestRequest::new(self.clone(), http::Method::GET, operation.into())
    }

    /// Sends all operations in one POST with a JSON array body and decodes
    /// the batched responses, in operation order.
    pub async fn batch(&self, operations: Vec<Operation>) -> Result<Vec<Response>, ClientError> {
        if operations.iter().any(|operation| operation.query.trim().is_empty()) {
            return Err(ClientError::EmptyQuery);
        }

        tracing::debug!(count = operations.len(), "sending batched operations");

        let mut request = self.http.post(self.endpoint.clone());
        if let Some((name, value)) = self.auth_header.clone() {
            request = request.header(name, value);
        }
        let response = request.json(&operations).send().await?;

        match decode_body(response).await? {
            Value::Array(bodies) => Ok(bodies.into_iter().map(Response::from_value).collect()),
            other => Err(ClientError::MalformedBatch(other)),
        }
    }

    /// Sends every operation as its own POST, with staggered start times
    /// and a cap on how many are in flight at once. The responses come
    /// back in operation order regardless of completion order.
    pub async fn concurrent(&self, operations: Vec<Operation>) -> Result<Vec<Response>, ClientError> {
        use futures::StreamExt as _;

        let stagger = self.stagger;
        let limit = self.concurrency_limit.max(1);
        tracing::debug!(count = operations.len(), ?stagger, limit, "sending concurrent operations");

        let indexed = futures::stream::iter(operations.into_iter().enumerate().map(|(index, operation)| {
            let client = self.clone();
            async move {
                // Stagger the start times so the endpoint sees a ramp
                // instead of a thundering herd.
                tokio::time::sleep(stagger * (index as u32 + 1)).await;
                (index, client.post(operation).await)
            }
        }))
        .buffer_unordered(limit)
        .collect::<Vec<_>>()
        .await;

        let mut responses = Vec::with_capacity(indexed.len());
        for (index, response) in indexed {
            responses.push((index, response?));
        }
        responses.sort_by_key(|(index, _)| *index);

        Ok(responses.into_iter().map(|(_, response)| response).collect())
    }
}

/// Configures and builds a [`TestClient`].
#[derive(Debug)]
#[must_use]
pub struct ClientBuilder {
    endpoint: String,
    auth_header: Option<(String, String)>,
    timeout: Option<Duration>,
    stagger: Duration,
    concurrency_limit: usize,
}

impl ClientBuilder {
    fn new(endpoint: &str) -> ClientBuilder {
        ClientBuilder {
            endpoint: endpoint.to_owned(),
            auth_header: None,
            timeout: None,
            stagger: Duration::from_millis(800),
            concurrency_limit: 10,
        }
    }

    /// A header sent with every request, typically `Authorization`.
    /// Individual requests can opt out with
    /// [`without_auth`](TestRequest::without_auth).
    pub fn auth_header(mut self, name: &str, value: &str) -> ClientBuilder {
        self.auth_header = Some((name.to_owned(), value.to_owned()));
        self
    }

    /// Overall timeout applied to every request.
    pub fn timeout(mut self, timeout: Duration) -> ClientBuilder {
        self.timeout = Some(timeout);
        self
    }

    /// Delay between the start times of consecutive operations in
    /// [`TestClient::concurrent`]. Defaults to 800ms.
    pub fn stagger(mut self, stagger: Duration) -> ClientBuilder {
        self.stagger = stagger;
        self
    }

    /// Maximum number of in-flight operations in
    /// [`TestClient::concurrent`]. Defaults to 10.
    pub fn concurrency_limit(mut self, limit: usize) -> ClientBuilder {
        self.concurrency_limit = limit;
        self
    }

    pub fn build(self) -> Result<TestClient, ClientError> {
        let endpoint = Url::parse(&self.endpoint)?;

        let auth_header = self
            .auth_header
            .map(|(name, value)| {
                Ok::<_, ClientError>((
                    http::HeaderName::from_bytes(name.as_bytes())?,
                    http::HeaderValue::from_str(&value)?,
                ))
            })
            .transpose()?;

        let mut http = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(TestClient {
            http: http.build()?,
            endpoint,
            auth_header,
            stagger: self.stagger,
            concurrency_limit: self.concurrency_limit,
        })
    }
}
