//! Process-wide tracing setup shared by the binaries.

/// Initialize process-wide tracing/logging, JSON unless `AGENCY_LOG_FORMAT=pretty`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(Format::from_env());
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::Format;
