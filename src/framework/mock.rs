//! # Mock Transport
//!
//! Utilities for testing action dispatch without a network.
//!
//! [`MockTransport`] records every request it receives (so tests can count and inspect
//! them) and answers from a queue of expectations built with
//! [`expect_post`](MockTransport::expect_post) / [`expect`](MockTransport::expect).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::{AjaxOptions, Method, Transport, TransportError};

/// A request as seen by the [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub method: Method,
    pub options: AjaxOptions,
}

/// An expected request and the reply to give it.
struct Expectation {
    method: Method,
    url: String,
    response: Result<Value, TransportError>,
}

/// A spy [`Transport`] with expectation tracking for fluent testing.
///
/// Requests that arrive with no expectation queued are answered with `null`, like an
/// empty `204` response.
///
/// # Example
/// ```ignore
/// let transport = Arc::new(MockTransport::new());
/// transport.expect_post("/posts/42/publish").return_ok(json!({"ok": true}));
///
/// let adapter = RestAdapter::new(transport.clone());
/// // Use the adapter in tests...
/// transport.verify(); // Ensures all expectations were met
/// ```
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    expectations: Mutex<VecDeque<Expectation>>,
}

impl MockTransport {
    /// Creates a new mock transport with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `POST` to `url`.
    pub fn expect_post(&self, url: impl Into<String>) -> ExpectationBuilder<'_> {
        self.expect(Method::POST, url)
    }

    /// Expects a request with `method` to `url`.
    pub fn expect(&self, method: Method, url: impl Into<String>) -> ExpectationBuilder<'_> {
        ExpectationBuilder {
            method,
            url: url.into(),
            expectations: &self.expectations,
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn ajax(
        &self,
        url: &str,
        method: Method,
        options: AjaxOptions,
    ) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_owned(),
            method: method.clone(),
            options,
        });

        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(exp) if exp.method == method && exp.url == url => exp.response,
            Some(exp) => panic!(
                "Unexpected request: {method} {url} (expected {} {})",
                exp.method, exp.url
            ),
            None => Ok(Value::Null),
        }
    }
}

/// Builder for request expectations.
pub struct ExpectationBuilder<'a> {
    method: Method,
    url: String,
    expectations: &'a Mutex<VecDeque<Expectation>>,
}

impl ExpectationBuilder<'_> {
    /// Sets the expectation to return a successful body.
    pub fn return_ok(self, body: Value) {
        self.push(Ok(body));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Value, TransportError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            method: self.method,
            url: self.url,
            response,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_transport_with_expectations() {
        let transport = MockTransport::new();
        transport.expect_post("/posts/1/publish").return_ok(json!({"ok": true}));
        transport
            .expect(Method::GET, "/posts")
            .return_err(TransportError::Request {
                url: "/posts".into(),
                reason: "offline".into(),
            });

        let first = transport
            .ajax("/posts/1/publish", Method::POST, AjaxOptions::with_data(json!(1)))
            .await;
        assert_eq!(first, Ok(json!({"ok": true})));

        let second = transport.ajax("/posts", Method::GET, AjaxOptions::default()).await;
        assert!(matches!(second, Err(TransportError::Request { .. })));

        assert_eq!(transport.call_count(), 2);
        assert_eq!(transport.requests()[0].options.data, Some(json!(1)));
        transport.verify();
    }

    #[tokio::test]
    async fn test_unqueued_request_gets_null() {
        let transport = MockTransport::new();
        let reply = transport.ajax("/anything", Method::POST, AjaxOptions::default()).await;
        assert_eq!(reply, Ok(Value::Null));
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected request")]
    async fn test_mismatched_request_panics() {
        let transport = MockTransport::new();
        transport.expect_post("/posts/archive").return_ok(Value::Null);
        let _ = transport.ajax("/posts/publish", Method::POST, AjaxOptions::default()).await;
    }

    #[test]
    #[should_panic(expected = "Not all expectations were met")]
    fn test_verify_panics_on_leftovers() {
        let transport = MockTransport::new();
        transport.expect_post("/posts/archive").return_ok(Value::Null);
        transport.verify();
    }
}
