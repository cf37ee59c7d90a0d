//! Storage-backed services used by the editor session.
//!
//! ARCHITECTURE
//! ============
//! Service modules own everything that touches the blob store, so the
//! document store and interaction controller stay synchronous and pure.

pub mod persistence;
pub mod recent;

/// Stable machine-readable code for an error, for hosts that map failures
/// to user-facing messages.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
