//! Tracing and logging setup shared by storefront binaries.

/// Initialize process-wide tracing with the format named by
/// `STOREFRONT_LOG_FORMAT` (JSON when unset).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::{LogFormat, LogFormatError, init_with};
