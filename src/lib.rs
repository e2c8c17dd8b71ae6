//! # NetLens Core
//!
//! In-process HTTP traffic capture engine for the NetLens inspector.
//! Built with Rust for speed and reliability.
//!
//! ## Features
//!
//! - Transparent interception of every request sent through a shared recorder
//! - Request/response correlation with wall-clock and elapsed timing
//! - Bounded, concurrency-safe traffic history with FIFO eviction
//! - Read-only query surface for inspection UIs
//! - Export of captured traffic to HAR 1.2
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Application call sites                  │
//! ├─────────────────────────────────────────────────────────┤
//! │                   NetLens Core (Rust)                    │
//! │  ┌──────────┐  ┌────────────┐  ┌─────────┐  ┌────────┐  │
//! │  │ Recorder │──│ Correlator │──│ Traffic │──│ Query  │  │
//! │  │  (hook)  │  │            │  │  Store  │  │ Facade │  │
//! │  └────┬─────┘  └────────────┘  └─────────┘  └────────┘  │
//! │       │                                                  │
//! │  ┌────┴─────┐                                            │
//! │  │Transport │  (reqwest, the real network call)          │
//! │  └──────────┘                                            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The recorder forwards every response and error to the caller unmodified;
//! capture is observation only.

pub mod api;
pub mod intercept;
pub mod models;
pub mod storage;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
