//! Export captured traffic to HTTP Archive (HAR) 1.2
//!
//! The export works on a snapshot of records, so it never holds the store's
//! lock while serializing or writing.

use crate::models::TrafficRecord;
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

const HAR_VERSION: &str = "1.2";
const CREATOR_NAME: &str = "NetLens";
const CREATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
pub struct HarLog {
    log: HarLogInner,
}

#[derive(Serialize)]
struct HarLogInner {
    version: &'static str,
    creator: HarCreator,
    entries: Vec<HarEntry>,
}

#[derive(Serialize)]
struct HarCreator {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HarEntry {
    started_date_time: String,
    /// Total elapsed time in milliseconds
    time: f64,
    request: HarRequest,
    response: HarResponse,
    cache: HarCache,
    timings: HarTimings,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HarRequest {
    method: String,
    url: String,
    http_version: &'static str,
    cookies: Vec<()>,
    headers: Vec<HarHeader>,
    query_string: Vec<HarQueryItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_data: Option<HarPostData>,
    headers_size: i64,
    body_size: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HarResponse {
    status: u16,
    status_text: String,
    http_version: &'static str,
    cookies: Vec<()>,
    headers: Vec<HarHeader>,
    content: HarContent,
    #[serde(rename = "redirectURL")]
    redirect_url: String,
    headers_size: i64,
    body_size: i64,
}

#[derive(Serialize)]
struct HarHeader {
    name: String,
    value: String,
}

#[derive(Serialize)]
struct HarQueryItem {
    name: String,
    value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HarPostData {
    mime_type: String,
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HarContent {
    size: i64,
    mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
struct HarCache {}

#[derive(Serialize)]
struct HarTimings {
    send: f64,
    wait: f64,
    receive: f64,
}

fn headers_to_har(headers: &std::collections::HashMap<String, String>) -> Vec<HarHeader> {
    let mut out: Vec<HarHeader> = headers
        .iter()
        .map(|(name, value)| HarHeader {
            name: name.clone(),
            value: value.clone(),
        })
        .collect();
    // Stable output for diffing exports
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

fn query_items(url: &str) -> Vec<HarQueryItem> {
    let Some((_, query)) = url.split_once('?') else {
        return Vec::new();
    };
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => HarQueryItem {
                name: name.to_string(),
                value: value.to_string(),
            },
            None => HarQueryItem {
                name: pair.to_string(),
                value: String::new(),
            },
        })
        .collect()
}

fn content_type_of(headers: &std::collections::HashMap<String, String>) -> String {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.clone())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

fn record_to_entry(record: &TrafficRecord) -> HarEntry {
    let time_ms = record.elapsed_seconds * 1000.0;

    let post_data = record.request_body.as_ref().map(|text| HarPostData {
        mime_type: content_type_of(&record.request_headers),
        text: text.clone(),
    });
    let request_body_size = record
        .request_body
        .as_ref()
        .map(|b| b.len() as i64)
        .unwrap_or(-1);

    let response_headers = record.response_headers.clone().unwrap_or_default();
    let response_body_size = record
        .response_body
        .as_ref()
        .map(|b| b.len() as i64)
        .unwrap_or(-1);

    HarEntry {
        started_date_time: record.started_at.to_rfc3339(),
        time: time_ms,
        request: HarRequest {
            method: record.method.to_string(),
            url: record.url.clone(),
            http_version: "HTTP/1.1",
            cookies: Vec::new(),
            headers: headers_to_har(&record.request_headers),
            query_string: query_items(&record.url),
            post_data,
            headers_size: -1,
            body_size: request_body_size,
        },
        response: HarResponse {
            // HAR has no slot for transport failures; status 0 plus the
            // entry comment carries the error description
            status: record.status_code.unwrap_or(0),
            status_text: String::new(),
            http_version: "HTTP/1.1",
            cookies: Vec::new(),
            headers: headers_to_har(&response_headers),
            content: HarContent {
                size: response_body_size.max(0),
                mime_type: content_type_of(&response_headers),
                text: record.response_body.clone(),
            },
            redirect_url: String::new(),
            headers_size: -1,
            body_size: response_body_size,
        },
        cache: HarCache {},
        timings: HarTimings {
            send: 0.0,
            wait: time_ms,
            receive: 0.0,
        },
        comment: record.error.clone(),
    }
}

/// Build the HAR document for a snapshot of records
pub fn records_to_har(records: &[TrafficRecord]) -> HarLog {
    HarLog {
        log: HarLogInner {
            version: HAR_VERSION,
            creator: HarCreator {
                name: CREATOR_NAME,
                version: CREATOR_VERSION,
            },
            entries: records.iter().map(record_to_entry).collect(),
        },
    }
}

/// Serialize a snapshot of records to pretty-printed HAR JSON
pub fn export_har(records: &[TrafficRecord]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(&records_to_har(records)).context("serializing HAR export")
}

/// Write a HAR export to a file
pub fn export_har_to_path(records: &[TrafficRecord], path: &Path) -> anyhow::Result<()> {
    let json = export_har(records)?;
    std::fs::write(path, json).with_context(|| format!("writing HAR export to {:?}", path))?;
    tracing::info!(entries = records.len(), path = %path.display(), "HAR export written");
    Ok(())
}
