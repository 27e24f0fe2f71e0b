//! # Process replacement.
//!
//! A [`Replace`] implementation swaps the running process image for a fresh
//! load of an executable, keeping the process identity.
//!
//! ## Contract
//! - On success the call **never resolves**: the new image starts from its own
//!   entry point and nothing after the call runs in this process.
//! - On failure it resolves to a classified [`ExecError`]; only
//!   [`ExecError::Busy`] is worth retrying.
//!
//! A test double can model success as a future that never completes
//! (`std::future::pending`), which is observationally the same thing.

mod execve;

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;

use crate::error::ExecError;

pub use execve::Execve;

/// Replaces the current process image.
#[async_trait]
pub trait Replace: Send + Sync + 'static {
    /// Attempts to exec `path` with `argv` (including argv\[0\]) and `envv`.
    ///
    /// Returns only on failure.
    async fn replace(
        &self,
        path: &Path,
        argv: &[OsString],
        envv: &[(OsString, OsString)],
    ) -> ExecError;
}
