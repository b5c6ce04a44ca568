//! Observability bootstrap (tracing subscriber setup).

/// Initialize tracing with JSON output.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::{init_with, LogFormat};
