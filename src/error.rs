//! Error types used by the autoreload runtime and process replacers.
//!
//! This module defines two main error enums:
//!
//! - [`ReloadError`]: errors that end supervision (startup failures, broken
//!   watches, failed or exhausted replacement).
//! - [`ExecError`]: errors returned by a single process-replacement attempt.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging,
//! and [`ExecError::is_retryable`] classifies replacement failures.

use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

/// # Errors that terminate supervision.
///
/// Every variant is fatal: the embedded reloader reports it once through the
/// configured [`Report`](crate::Report) and terminates the host process.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ReloadError {
    /// A command name or path could not be resolved to an executable file.
    #[error("cannot find executable: {name}")]
    Lookup {
        /// The name or path that was looked up.
        name: String,
        /// The underlying lookup failure.
        #[source]
        source: which::Error,
    },

    /// The change source failed to establish or keep a watch.
    #[error("error watching {path}: {source}")]
    Watch {
        /// The watched path.
        path: PathBuf,
        /// The underlying watcher failure.
        #[source]
        source: notify::Error,
    },

    /// The change source stopped delivering notifications.
    #[error("change source for {path} closed")]
    SourceClosed {
        /// The watched path.
        path: PathBuf,
    },

    /// A replacement attempt failed with a non-retryable error.
    #[error("exec {path} failed: {source}")]
    Exec {
        /// Path of the executable that was exec'd.
        path: PathBuf,
        /// The classified replacement failure.
        #[source]
        source: ExecError,
    },

    /// Every replacement attempt of a reload cycle reported a busy executable.
    #[error("max attempts reached ({attempts})")]
    MaxAttempts {
        /// Number of attempts that were made.
        attempts: u32,
    },

    /// The thread or runtime hosting the watch loop could not be created.
    #[error("failed to start watch loop: {0}")]
    Runtime(#[source] std::io::Error),
}

impl ReloadError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use autoreload::ReloadError;
    ///
    /// let err = ReloadError::MaxAttempts { attempts: 3 };
    /// assert_eq!(err.as_label(), "reload_max_attempts");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ReloadError::Lookup { .. } => "reload_lookup",
            ReloadError::Watch { .. } => "reload_watch",
            ReloadError::SourceClosed { .. } => "reload_source_closed",
            ReloadError::Exec { .. } => "reload_exec",
            ReloadError::MaxAttempts { .. } => "reload_max_attempts",
            ReloadError::Runtime(_) => "reload_runtime",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ReloadError::Lookup { name, source } => format!("lookup {name}: {source}"),
            ReloadError::Watch { path, source } => {
                format!("watch {}: {source}", path.display())
            }
            ReloadError::SourceClosed { path } => {
                format!("change source for {} closed", path.display())
            }
            ReloadError::Exec { path, source } => format!("exec {}: {source}", path.display()),
            ReloadError::MaxAttempts { attempts } => {
                format!("max attempts reached after {attempts} attempts")
            }
            ReloadError::Runtime(e) => format!("runtime: {e}"),
        }
    }

    /// Returns the message reported alongside this error right before the
    /// process terminates.
    pub fn context(&self) -> String {
        match self {
            ReloadError::Lookup { name, .. } => format!("Cannot find executable: {name}"),
            ReloadError::Watch { .. } => "Error watching file".to_string(),
            ReloadError::SourceClosed { .. } => "Error watching file".to_string(),
            ReloadError::Exec { path, .. } => format!("exec: {}", path.display()),
            ReloadError::MaxAttempts { .. } => "Failed to reload process".to_string(),
            ReloadError::Runtime(_) => "Failed to start watch loop".to_string(),
        }
    }
}

/// # Errors produced by one process-replacement attempt.
///
/// A busy executable (still open for writing by the toolchain) is expected to
/// clear up shortly and is retried; everything else is fatal.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ExecError {
    /// The executable is still open for writing (`ETXTBSY`).
    #[error("text file busy")]
    Busy,

    /// Any other OS-level failure.
    #[error("{0}")]
    Sys(Errno),

    /// An argument or environment entry contains an interior nul byte.
    #[error("interior nul byte: {0}")]
    Nul(#[from] std::ffi::NulError),
}

impl From<Errno> for ExecError {
    fn from(errno: Errno) -> Self {
        match errno {
            Errno::ETXTBSY => ExecError::Busy,
            other => ExecError::Sys(other),
        }
    }
}

impl ExecError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ExecError::Busy => "exec_busy",
            ExecError::Sys(_) => "exec_sys",
            ExecError::Nul(_) => "exec_nul",
        }
    }

    /// Indicates whether the attempt may succeed if retried.
    ///
    /// Returns `true` only for [`ExecError::Busy`].
    ///
    /// # Example
    /// ```
    /// use autoreload::ExecError;
    /// use nix::errno::Errno;
    ///
    /// assert!(ExecError::from(Errno::ETXTBSY).is_retryable());
    /// assert!(!ExecError::from(Errno::ENOENT).is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExecError::Busy)
    }
}
