//! # LogReporter: default reporter
//!
//! Forwards reporter calls to [`tracing`]. Install any subscriber (for example
//! `tracing_subscriber::fmt`) to see the output.
//!
//! ## Example output
//! ```text
//! INFO autoreload: Executable changed; reloading process
//! ERROR autoreload: Failed to reload process error=max attempts reached (10)
//! ```

use crate::reporters::Report;

/// Reporter that writes through the `tracing` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl LogReporter {
    /// Construct a new [`LogReporter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Report for LogReporter {
    fn info(&self, msg: &str) {
        tracing::info!(target: "autoreload", "{msg}");
    }

    fn error(&self, msg: &str, err: &(dyn std::error::Error + 'static)) {
        tracing::error!(target: "autoreload", error = %err, "{msg}");
    }
}
