//! Filtering predicates for captured traffic

use crate::models::{HttpMethod, TrafficRecord};
use serde::{Deserialize, Serialize};

/// Filter options for listing captured records
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecordFilter {
    /// Match a specific HTTP method
    pub method: Option<HttpMethod>,
    /// Case-insensitive URL substring
    pub url_contains: Option<String>,
    /// Minimum HTTP status (inclusive)
    pub status_min: Option<u16>,
    /// Maximum HTTP status (inclusive)
    pub status_max: Option<u16>,
    /// Keep only records that carry a transport error
    pub errors_only: bool,
}

impl RecordFilter {
    pub fn matches(&self, record: &TrafficRecord) -> bool {
        if let Some(method) = self.method {
            if record.method != method {
                return false;
            }
        }
        if let Some(needle) = &self.url_contains {
            if !record
                .url
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase())
            {
                return false;
            }
        }
        if let Some(min) = self.status_min {
            if record.status_code.unwrap_or(0) < min {
                return false;
            }
        }
        if let Some(max) = self.status_max {
            if record.status_code.unwrap_or(0) > max {
                return false;
            }
        }
        if self.errors_only && record.error.is_none() {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    fn record(url: &str, method: HttpMethod, status: Option<u16>, error: Option<&str>) -> TrafficRecord {
        TrafficRecord {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.to_string(),
            method,
            request_headers: HashMap::new(),
            response_headers: None,
            request_body: None,
            response_body: None,
            status_code: status,
            error: error.map(str::to_owned),
            started_at: Utc::now(),
            elapsed_seconds: 0.0,
        }
    }

    #[test]
    fn default_filter_matches_everything() {
        let filter = RecordFilter::default();
        assert!(filter.matches(&record("https://a.test/", HttpMethod::Get, Some(200), None)));
        assert!(filter.matches(&record("https://a.test/", HttpMethod::Post, None, Some("down"))));
    }

    #[test]
    fn url_substring_is_case_insensitive() {
        let filter = RecordFilter {
            url_contains: Some("API.Example".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&record(
            "https://api.example.com/v1",
            HttpMethod::Get,
            Some(200),
            None
        )));
        assert!(!filter.matches(&record("https://other.test/", HttpMethod::Get, Some(200), None)));
    }

    #[test]
    fn status_range_excludes_missing_status() {
        let filter = RecordFilter {
            status_min: Some(400),
            status_max: Some(499),
            ..Default::default()
        };
        assert!(filter.matches(&record("https://a.test/", HttpMethod::Get, Some(404), None)));
        assert!(!filter.matches(&record("https://a.test/", HttpMethod::Get, Some(200), None)));
        assert!(!filter.matches(&record("https://a.test/", HttpMethod::Get, None, Some("x"))));
    }

    #[test]
    fn errors_only_selects_failed_requests() {
        let filter = RecordFilter {
            errors_only: true,
            ..Default::default()
        };
        assert!(filter.matches(&record("https://a.test/", HttpMethod::Get, None, Some("timeout"))));
        assert!(!filter.matches(&record("https://a.test/", HttpMethod::Get, Some(200), None)));
    }
}
