//! Public surface for the presentation layer

mod query;

pub use query::{SortOrder, TrafficQuery};

/// Initialize tracing output for the library (call once at startup).
///
/// Honors `RUST_LOG` for the level; defaults to info. Safe to call more than
/// once; later calls are no-ops if a subscriber is already installed.
pub fn init_logging() {
    let level = resolve_log_level();
    let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
    tracing::info!("NetLens core initialized v{}", env!("CARGO_PKG_VERSION"));
}

fn resolve_log_level() -> tracing::level_filters::LevelFilter {
    use tracing::level_filters::LevelFilter;

    match std::env::var("RUST_LOG") {
        Ok(value) => match value.to_ascii_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            "off" => LevelFilter::OFF,
            _ => LevelFilter::INFO,
        },
        Err(_) => LevelFilter::INFO,
    }
}
