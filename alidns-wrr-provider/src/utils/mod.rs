//! Utility modules.

/// Masking helpers for log output.
pub mod log_sanitizer;
