//! # Reporters for the autoreload runtime.
//!
//! This module provides the [`Report`] trait and its built-in implementations.
//!
//! ## Reporter types
//! - [`LogReporter`] (default) writes through `tracing`
//! - [`NoopReporter`] discards everything; selected by
//!   `AutoReloaderBuilder::with_logger(None)`
//!
//! ## Message flow
//! ```text
//! start() ── lookup/subscribe failure ──► Report::error ──► exit(1)
//! WatchLoop ── reload triggered ─────────► Report::info
//!           ── fatal ReloadError ────────► Report::error ──► exit(1)
//! ```

mod log;
mod noop;
mod report;

pub use log::LogReporter;
pub use noop::NoopReporter;
pub use report::Report;
