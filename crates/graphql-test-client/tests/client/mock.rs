//! A canned GraphQL endpoint for exercising the client.
//!
//! Every operation is echoed back under `data.echo` together with the
//! transport details the handler saw, so tests can assert on what actually
//! went over the wire. A few magic words in the query trigger degenerate
//! responses instead.

use std::{collections::HashMap, time::Duration};

use axum::{
    extract::Query,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

pub struct MockGraphqlServer {
    port: u16,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockGraphqlServer {
    pub async fn start() -> MockGraphqlServer {
        let app = Router::new().route("/graphql", post(graphql_post).get(graphql_get));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (shutdown, shutdown_receiver) = oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_receiver.await.ok();
                })
                .await
                .unwrap();
        });

        // Give the server time to start up.
        tokio::time::sleep(Duration::from_millis(20)).await;

        MockGraphqlServer {
            port,
            shutdown: Some(shutdown),
        }
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}/graphql", self.port)
    }
}

impl Drop for MockGraphqlServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.send(()).ok();
        }
    }
}

async fn graphql_post(headers: http::HeaderMap, Json(body): Json<Value>) -> Response {
    let authorization = authorization_from(&headers);

    match body {
        Value::Array(operations) => {
            let responses: Vec<Value> = operations
                .iter()
                .map(|operation| echo_envelope(operation, "POST", authorization.as_deref()))
                .collect();
            Json(Value::Array(responses)).into_response()
        }
        operation => respond_to(&operation, "POST", authorization.as_deref()).await,
    }
}

async fn graphql_get(
    headers: http::HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let authorization = authorization_from(&headers);

    let mut operation = serde_json::Map::new();
    if let Some(query) = params.get("query") {
        operation.insert("query".to_owned(), Value::String(query.clone()));
    }
    if let Some(variables) = params.get("variables") {
        if let Ok(variables) = serde_json::from_str::<Value>(variables) {
            operation.insert("variables".to_owned(), variables);
        }
    }
    if let Some(name) = params.get("operationName") {
        operation.insert("operationName".to_owned(), Value::String(name.clone()));
    }

    respond_to(&Value::Object(operation), "GET", authorization.as_deref()).await
}

async fn respond_to(operation: &Value, method: &str, authorization: Option<&str>) -> Response {
    let query = operation.get("query").and_then(Value::as_str).unwrap_or_default();

    if query.contains("teapot") {
        return (http::StatusCode::IM_A_TEAPOT, "short and stout".to_owned()).into_response();
    }
    if query.contains("emptyBody") {
        return String::new().into_response();
    }
    if query.contains("notJson") {
        return "<!doctype html><p>maintenance</p>".to_owned().into_response();
    }
    if query.contains("boom") {
        return Json(json!({
            "errors": [{ "message": "Internal server error", "path": ["boom"] }]
        }))
        .into_response();
    }
    if query.contains("slow") {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    Json(echo_envelope(operation, method, authorization)).into_response()
}

fn echo_envelope(operation: &Value, method: &str, authorization: Option<&str>) -> Value {
    json!({
        "data": {
            "echo": {
                "method": method,
                "query": operation.get("query").cloned().unwrap_or(Value::Null),
                "variables": operation.get("variables").cloned().unwrap_or(Value::Null),
                "operationName": operation.get("operationName").cloned().unwrap_or(Value::Null),
                "authorization": authorization,
            }
        }
    })
}

fn authorization_from(headers: &http::HeaderMap) -> Option<String> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}
