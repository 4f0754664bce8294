//! `reqwest`-backed [`Transport`].

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{AjaxOptions, Method, Transport, TransportError};

/// Sends requests over HTTP(S) and decodes JSON responses.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client (timeouts, proxies, TLS roots...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, options))]
    async fn ajax(
        &self,
        url: &str,
        method: Method,
        options: AjaxOptions,
    ) -> Result<Value, TransportError> {
        let is_get = method == Method::GET;
        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request = match &options.data {
            Some(data) if is_get => request.query(data),
            Some(data) => request.json(data),
            None => request,
        };

        let response = request.send().await.map_err(|e| TransportError::Request {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|e| TransportError::Request {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        debug!(status = status.as_u16(), bytes = text.len(), "Response");

        if !status.is_success() {
            let body = decode(&text).unwrap_or(Value::String(text));
            return Err(TransportError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
                body,
            });
        }

        decode(&text).map_err(|e| TransportError::Decode {
            url: url.to_owned(),
            reason: e.to_string(),
        })
    }
}

/// An empty body (e.g. `204 No Content`) decodes to `null`.
fn decode(text: &str) -> Result<Value, serde_json::Error> {
    if text.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_empty_body_is_null() {
        assert_eq!(decode("").unwrap(), Value::Null);
        assert_eq!(decode("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_json_body() {
        assert_eq!(decode(r#"{"ok":true}"#).unwrap(), json!({"ok": true}));
        assert!(decode("<html>").is_err());
    }
}
