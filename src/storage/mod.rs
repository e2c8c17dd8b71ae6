//! Traffic retention and export

mod har;
mod traffic_store;

pub use har::{export_har, export_har_to_path, records_to_har};
pub use traffic_store::{TrafficStore, DEFAULT_CAPACITY};
