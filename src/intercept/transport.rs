//! Transport seam between the recorder and the real network
//!
//! The recorder never touches sockets itself; it hands a request to a
//! [`Transport`] and observes whatever comes back. Production code uses
//! [`ReqwestTransport`]; tests substitute scripted implementations.

use crate::models::HttpMethod;
use anyhow::Context;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::future::Future;
use thiserror::Error;

/// Body attached to an outbound request.
///
/// Buffered bytes can be captured for the traffic record; a streaming body
/// is passed through to the transport but recorded as not capturable.
#[derive(Debug)]
pub enum RequestBody {
    Empty,
    Bytes(Vec<u8>),
    Stream(reqwest::Body),
}

impl RequestBody {
    /// Wrap a byte stream as a request body (forwarded, never captured)
    pub fn from_byte_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        RequestBody::Stream(reqwest::Body::wrap_stream(stream))
    }
}

/// Everything the transport needs to execute one request
#[derive(Debug)]
pub struct RequestParts {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: RequestBody,
}

impl RequestParts {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body = RequestBody::Bytes(bytes.into());
        self
    }

    pub fn body_stream(mut self, body: reqwest::Body) -> Self {
        self.body = RequestBody::Stream(body);
        self
    }
}

/// Response as observed at the transport boundary: status, headers, and the
/// fully buffered body
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

/// Failure completing a request. The recorder stores the description on the
/// traffic record and forwards the error to the caller unchanged.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
}

/// The consumed HTTP client abstraction: execute a request and complete with
/// either (status, headers, body) or an error.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        parts: RequestParts,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// Production transport over a shared `reqwest::Client`.
///
/// The client's connection pool, timeout, and redirect policy apply
/// unchanged; the recorder adds nothing on this path.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    /// Wrap an already configured client (custom timeouts, proxies, etc.)
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
        HttpMethod::Connect => reqwest::Method::CONNECT,
        HttpMethod::Trace => reqwest::Method::TRACE,
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        parts: RequestParts,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        let client = self.client.clone();
        async move {
            let url = reqwest::Url::parse(&parts.url).map_err(|e| TransportError::InvalidUrl {
                url: parts.url.clone(),
                reason: e.to_string(),
            })?;

            let mut request_builder = client.request(to_reqwest_method(parts.method), url);

            for (key, value) in &parts.headers {
                if let Ok(header_name) = reqwest::header::HeaderName::try_from(key.as_str()) {
                    if let Ok(header_value) = reqwest::header::HeaderValue::from_str(value) {
                        request_builder = request_builder.header(header_name, header_value);
                    }
                }
            }

            match parts.body {
                RequestBody::Empty => {}
                RequestBody::Bytes(bytes) => request_builder = request_builder.body(bytes),
                RequestBody::Stream(body) => request_builder = request_builder.body(body),
            }

            let response = request_builder.send().await.map_err(map_reqwest_error)?;

            let status = response.status().as_u16();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                .collect();
            let body = response.bytes().await.map_err(map_reqwest_error)?;

            Ok(TransportResponse {
                status,
                headers,
                body,
            })
        }
    }
}
