//! Traffic record model
//!
//! Represents a single completed HTTP request/response (or request/error)
//! pair captured by the recorder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Connect,
    Trace,
}

impl HttpMethod {
    /// Convert from string (lossy, defaults to GET)
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            "CONNECT" => HttpMethod::Connect,
            "TRACE" => HttpMethod::Trace,
            _ => HttpMethod::Get,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(HttpMethod::from_str_lossy(s))
    }
}

/// A single captured request/response pair.
///
/// Records are immutable once built: the correlator constructs one record per
/// completed request and the store only ever evicts whole records. Note that
/// store order reflects completion order, not issue order; a record holds no
/// sequence number of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficRecord {
    /// Unique identifier, assigned at creation and never reused
    pub id: String,

    /// Absolute target address of the request
    pub url: String,

    /// HTTP method
    pub method: HttpMethod,

    /// Request headers. Names are stored exactly as the transport reports
    /// them (reqwest reports lowercase names); no further canonicalization.
    pub request_headers: HashMap<String, String>,

    /// Response headers; `None` when no response was received
    pub response_headers: Option<HashMap<String, String>>,

    /// Request body decoded as UTF-8 text. `None` when absent, streamed, or
    /// not valid UTF-8; absence is distinct from an empty string.
    pub request_body: Option<String>,

    /// Response body decoded as UTF-8 text, same rules as `request_body`
    pub response_body: Option<String>,

    /// HTTP status code; absent when the request failed before a response
    pub status_code: Option<u16>,

    /// Short failure description; absent on success. Callers must not assume
    /// exclusivity with `status_code`.
    pub error: Option<String>,

    /// Wall-clock timestamp when the request was handed to the transport
    pub started_at: DateTime<Utc>,

    /// Duration from `started_at` to completion, measured with a monotonic
    /// clock. Always >= 0, computed once.
    pub elapsed_seconds: f64,
}

impl TrafficRecord {
    /// Whether a response was received and no transport error occurred
    pub fn succeeded(&self) -> bool {
        self.status_code.is_some() && self.error.is_none()
    }

    /// Get duration as formatted string
    pub fn duration_str(&self) -> String {
        let ms = self.elapsed_seconds * 1000.0;
        if ms < 1000.0 {
            format!("{}ms", ms.round() as u64)
        } else {
            format!("{:.1}s", self.elapsed_seconds)
        }
    }

    /// Get response body size as formatted string
    pub fn body_size_str(&self) -> String {
        match &self.response_body {
            Some(body) if body.len() < 1024 => format!("{}B", body.len()),
            Some(body) if body.len() < 1024 * 1024 => {
                format!("{:.1}KB", body.len() as f64 / 1024.0)
            }
            Some(body) => format!("{:.1}MB", body.len() as f64 / (1024.0 * 1024.0)),
            None => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(elapsed: f64) -> TrafficRecord {
        TrafficRecord {
            id: "r1".to_string(),
            url: "https://example.com/api".to_string(),
            method: HttpMethod::Get,
            request_headers: HashMap::new(),
            response_headers: None,
            request_body: None,
            response_body: None,
            status_code: Some(200),
            error: None,
            started_at: Utc::now(),
            elapsed_seconds: elapsed,
        }
    }

    #[test]
    fn method_round_trips_through_strings() {
        assert_eq!(HttpMethod::from_str_lossy("delete"), HttpMethod::Delete);
        assert_eq!(HttpMethod::Patch.as_str(), "PATCH");
        assert_eq!(HttpMethod::from_str_lossy("BREW"), HttpMethod::Get);
    }

    #[test]
    fn duration_formats_sub_second_and_seconds() {
        assert_eq!(sample_record(0.042).duration_str(), "42ms");
        assert_eq!(sample_record(2.5).duration_str(), "2.5s");
    }

    #[test]
    fn body_size_formats_by_magnitude() {
        let mut rec = sample_record(0.0);
        assert_eq!(rec.body_size_str(), "-");
        rec.response_body = Some("x".repeat(10));
        assert_eq!(rec.body_size_str(), "10B");
        rec.response_body = Some("x".repeat(2048));
        assert_eq!(rec.body_size_str(), "2.0KB");
    }

    #[test]
    fn success_requires_status_and_no_error() {
        let mut rec = sample_record(0.0);
        assert!(rec.succeeded());
        rec.error = Some("reset".to_string());
        assert!(!rec.succeeded());
        rec.error = None;
        rec.status_code = None;
        assert!(!rec.succeeded());
    }
}
