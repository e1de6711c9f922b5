//! # Transport — how a request reaches the backend
//!
//! [`ApiClient`](crate::ApiClient) never talks to the network directly. It
//! builds an [`ApiRequest`] and hands it to a [`Transport`]:
//!
//! - [`ReqwestTransport`] sends it over HTTP with `reqwest` (browser `fetch`
//!   on WASM, hyper on native).
//! - [`MemoryTransport`] answers from a scripted queue and records every
//!   request, so controllers can be exercised without a server.
//!
//! A transport only fails when no HTTP response exists. Non-2xx statuses are
//! returned as a normal [`ApiResponse`] and classified by the client.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
pub use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;

/// A request relative to the API root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, e.g. `"users/favorites/"`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: Vec<(&'static str, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Whether the request changes server state and so needs a CSRF token.
    pub fn is_mutating(&self) -> bool {
        !matches!(self.method, Method::GET | Method::HEAD | Method::OPTIONS)
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and decoded body. A body that is not JSON decodes to `Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The request was sent but nothing came back.
    #[error("no response: {0}")]
    NoResponse(String),
    /// The request could not be constructed.
    #[error("invalid request: {0}")]
    Build(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            TransportError::Build(e.to_string())
        } else {
            TransportError::NoResponse(e.to_string())
        }
    }
}

/// Async seam between the client and the network.
pub trait Transport {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<ApiResponse, TransportError>>;
}

/// HTTP transport backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    pub fn new(config: ClientConfig) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let builder = reqwest::Client::builder().timeout(config.timeout());
        #[cfg(target_arch = "wasm32")]
        let builder = reqwest::Client::builder();

        let client = builder.build().unwrap_or_else(|e| {
            tracing::error!("failed to configure HTTP client, using defaults: {e}");
            reqwest::Client::new()
        });
        Self { client, config }
    }

    #[cfg(target_arch = "wasm32")]
    fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.config.endpoint(&request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        tracing::debug!("{} {} -> {}", request.method, url, status);
        Ok(ApiResponse { status, body })
    }
}

impl Transport for ReqwestTransport {
    #[cfg(not(target_arch = "wasm32"))]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.execute(request).await
    }

    // `fetch` has no timeout of its own, so race it against a timer.
    #[cfg(target_arch = "wasm32")]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        use futures::future::{select, Either};

        let timeout = self.timeout();
        let request_fut = Box::pin(self.execute(request));
        let timer = Box::pin(gloo_timers::future::sleep(timeout));
        match select(request_fut, timer).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => Err(TransportError::NoResponse(format!(
                "timed out after {}s",
                timeout.as_secs()
            ))),
        }
    }
}

/// In-memory transport: replies from a FIFO script and records every request.
#[derive(Clone, Debug, Default)]
pub struct MemoryTransport {
    replies: Rc<RefCell<VecDeque<Result<ApiResponse, TransportError>>>>,
    sent: Rc<RefCell<Vec<ApiRequest>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next reply.
    pub fn reply(&self, reply: Result<ApiResponse, TransportError>) -> &Self {
        self.replies.borrow_mut().push_back(reply);
        self
    }

    /// Queue a reply with the given status and body.
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.reply(Ok(ApiResponse::new(status, body)))
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Transport for MemoryTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::NoResponse("no scripted reply".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mutating_methods() {
        assert!(!ApiRequest::get("scenic/list/").is_mutating());
        assert!(ApiRequest::post("orders/create/").is_mutating());
        assert!(ApiRequest::put("orders/cancel/1/").is_mutating());
        assert!(ApiRequest::delete("comments/1/").is_mutating());
    }

    #[test]
    fn test_request_lookup_helpers() {
        let req = ApiRequest::delete("users/favorites/")
            .query("target_id", "7")
            .header("X-CSRFToken", "abc");
        assert_eq!(req.query_value("target_id"), Some("7"));
        assert_eq!(req.header_value("x-csrftoken"), Some("abc"));
        assert_eq!(req.query_value("missing"), None);
    }

    #[tokio::test]
    async fn test_memory_transport_replays_in_order() {
        let transport = MemoryTransport::new();
        transport
            .respond(200, json!({ "n": 1 }))
            .respond(404, json!({}));

        let first = transport.send(ApiRequest::get("a/")).await.unwrap();
        let second = transport.send(ApiRequest::get("b/")).await.unwrap();
        let third = transport.send(ApiRequest::get("c/")).await;

        assert_eq!(first.body, json!({ "n": 1 }));
        assert_eq!(second.status, 404);
        assert!(matches!(third, Err(TransportError::NoResponse(_))));
        assert_eq!(transport.sent_count(), 3);
        assert_eq!(transport.sent()[1].path, "b/");
    }
}
