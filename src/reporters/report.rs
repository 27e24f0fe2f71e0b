//! # Core reporter trait
//!
//! `Report` is the two-method logging capability the reloader writes to:
//! informational messages mark reload triggers, error messages mark fatal
//! conditions right before the process terminates.
//!
//! ## Contract
//! - Both methods are synchronous and are called from the watch loop (or from
//!   `start` on the caller's thread); keep them fast.
//! - `error` is called at most once per fatal condition, immediately before
//!   the exit handler runs.
//!
//! ## Example (skeleton)
//! ```rust
//! use autoreload::Report;
//!
//! struct Stderr;
//!
//! impl Report for Stderr {
//!     fn info(&self, msg: &str) {
//!         eprintln!("{msg}");
//!     }
//!
//!     fn error(&self, msg: &str, err: &(dyn std::error::Error + 'static)) {
//!         eprintln!("{msg}: {err}");
//!     }
//! }
//! ```

/// Logging capability injected into the reloader.
pub trait Report: Send + Sync + 'static {
    /// Logs an informational message.
    fn info(&self, msg: &str);

    /// Logs an error message together with its cause.
    fn error(&self, msg: &str, err: &(dyn std::error::Error + 'static));
}
