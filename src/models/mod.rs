//! Data models for NetLens Core
//!
//! These models describe captured traffic and are shared with the
//! presentation layer that lists and inspects records.

pub mod filter;
pub mod record;

pub use filter::*;
pub use record::*;
