//! Request/response correlation
//!
//! One [`CaptureInFlight`] is created per outbound request and finished
//! exactly once with whatever completion arrives: a response, a transport
//! error, or cancellation. Finishing produces the immutable traffic record.

use crate::intercept::transport::{RequestBody, RequestParts};
use crate::models::{HttpMethod, TrafficRecord};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Instant;

/// The completion side of a correlation
pub(crate) enum Completion {
    Response {
        status: u16,
        headers: HashMap<String, String>,
        body: Bytes,
    },
    Error(String),
}

/// Snapshot of a request taken before it is handed to the transport.
///
/// Holds both the wall clock (for `started_at`) and a monotonic instant, so
/// elapsed time is immune to wall-clock adjustments and can never be
/// negative.
pub(crate) struct CaptureInFlight {
    id: String,
    url: String,
    method: HttpMethod,
    request_headers: HashMap<String, String>,
    request_body: Option<String>,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl CaptureInFlight {
    pub(crate) fn begin(parts: &RequestParts) -> Self {
        let request_body = match &parts.body {
            RequestBody::Empty => None,
            RequestBody::Bytes(bytes) => decode_text(bytes),
            RequestBody::Stream(_) => {
                tracing::debug!(url = %parts.url, "request body is a stream; not captured");
                None
            }
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: parts.url.clone(),
            method: parts.method,
            request_headers: parts.headers.clone(),
            request_body,
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Consume the capture and produce the one record for this request
    pub(crate) fn finish(self, completion: Completion) -> TrafficRecord {
        let elapsed_seconds = self.started.elapsed().as_secs_f64();

        let (status_code, response_headers, response_body, error) = match completion {
            Completion::Response {
                status,
                headers,
                body,
            } => (Some(status), Some(headers), decode_text(&body), None),
            Completion::Error(message) => (None, None, None, Some(message)),
        };

        TrafficRecord {
            id: self.id,
            url: self.url,
            method: self.method,
            request_headers: self.request_headers,
            response_headers,
            request_body: self.request_body,
            response_body,
            status_code,
            error,
            started_at: self.started_at,
            elapsed_seconds,
        }
    }
}

/// Decode a buffered body as UTF-8 text. Decoding failure means the body is
/// recorded as unavailable, never surfaced as an error.
fn decode_text(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return Some(String::new());
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Some(text.to_owned()),
        Err(_) => {
            tracing::debug!(len = bytes.len(), "body is not valid UTF-8; not captured");
            None
        }
    }
}
