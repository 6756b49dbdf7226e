//! Global configuration for km_diff runtime behavior.
//!
//! Flags here are set once at startup and read by the matrix reader
//! without threading extra parameters through every call.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for strict key validation.
///
/// When disabled (the default) a malformed row logs a warning and ends the
/// stream it came from; the rest of that matrix is ignored and the run still
/// succeeds. When enabled the same row is reported as an error.
static STRICT_KEYS: AtomicBool = AtomicBool::new(false);

/// Enable or disable strict key validation.
///
/// # Example
///
/// ```
/// use km_diff::config;
///
/// // Enable at startup before any matrix is read
/// config::set_strict_keys(true);
/// assert!(config::is_strict_keys());
/// config::set_strict_keys(false);
/// ```
#[inline]
pub fn set_strict_keys(enabled: bool) {
    STRICT_KEYS.store(enabled, Ordering::Release);
}

/// Check if strict key validation is enabled.
#[inline]
pub fn is_strict_keys() -> bool {
    STRICT_KEYS.load(Ordering::Acquire)
}
