//! Tracing and logging setup shared by every process that embeds the creation core.

/// Initialize process-wide observability (tracing/logging).
///
/// Reads `RUST_LOG` and `LOG_FORMAT` from the environment.
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Subscriber configuration (filters, output format).
pub mod tracing;
