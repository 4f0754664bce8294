//! The network seam underneath the adapter.
//!
//! Adapters never talk HTTP themselves; they hand a URL, a method and [`AjaxOptions`] to a
//! [`Transport`]. [`HttpTransport`] is the `reqwest` implementation, and
//! [`MockTransport`](crate::framework::mock::MockTransport) is the one used in tests.

pub mod http;

pub use http::HttpTransport;
pub use reqwest::Method;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

/// Per-request options passed to [`Transport::ajax`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AjaxOptions {
    /// The request payload. Sent as the JSON body, or as the query string for `GET`.
    pub data: Option<Value>,
    pub headers: BTreeMap<String, String>,
}

impl AjaxOptions {
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            headers: BTreeMap::new(),
        }
    }
}

/// Errors produced by a transport.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum TransportError {
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16, body: Value },
    #[error("Invalid response body from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Asynchronous request submission.
///
/// Implementations decide what counts as a failure (e.g. non-2xx statuses). Callers above
/// this trait pass whatever comes back through untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn ajax(
        &self,
        url: &str,
        method: Method,
        options: AjaxOptions,
    ) -> Result<Value, TransportError>;
}
