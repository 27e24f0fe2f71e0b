//! Retry timing policies.
//!
//! ## Contents
//! - [`BackoffPolicy`] how long to wait before each replacement attempt
//!   (first / factor / max).
//!
//! ## Quick wiring
//! ```text
//! Config { retry_backoff: BackoffPolicy, debounce: Duration, .. }
//!      └─► core::watch::WatchLoop uses:
//!           - debounce as the quiet window that collapses bursts
//!           - retry_backoff.next(attempt) before every exec attempt
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → constant 250ms.

mod backoff;

pub use backoff::BackoffPolicy;
