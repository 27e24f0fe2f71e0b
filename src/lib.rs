//! # autoreload
//!
//! **autoreload** restarts a process when its executable changes on disk.
//!
//! Embed an [`AutoReloader`] in a program under development: when a rebuild
//! rewrites the binary, the reloader runs a shutdown hook and re-executes the
//! new binary in place (same PID, same arguments, same environment). The
//! `autoreload` launcher binary does the same for an arbitrary child command.
//!
//! This is a developer convenience; do not start it in production.
//!
//! ## Architecture
//! ```text
//!   ┌───────────────┐  subscribe(path)  ┌──────────────────┐
//!   │ ChangeSource  │ ◄──────────────── │  AutoReloader    │
//!   │ (NotifySource)│                   │  start() / stop()│
//!   └──────┬────────┘                   └────────┬─────────┘
//!          │ events / errors                      │ spawns (one task)
//!          ▼                                      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  WatchLoop                                                        │
//! │   Idle ──change──► Debouncing ──quiet 250ms──► Reloading          │
//! │                                                  ├─ sleep 250ms   │
//! │                                                  ├─ on_reload()   │ (attempt 1 only)
//! │                                                  └─ Replace::replace
//! └──────┬─────────────────────────────┬──────────────────────────────┘
//!        │ Report::info / error        │ publish(Event)
//!        ▼                             ▼
//!   LogReporter (tracing)        Bus (broadcast) ──► AutoReloader::subscribe()
//! ```
//!
//! ### Lifecycle
//! ```text
//! loop {
//!   ├─► wait for change (cancellable)
//!   ├─► debounce: each change restarts the quiet window (cancellable)
//!   └─► reload cycle:
//!         for attempt in 1..=max_attempts {
//!           ├─► sleep(retry_backoff), swallowing changes
//!           ├─► attempt == 1 → on_reload()
//!           └─► exec ─┬─ replaced   → (never returns)
//!                     ├─ busy       → continue
//!                     └─ other err  → fatal
//!         }
//!         fatal: max attempts reached
//! }
//!
//! fatal ─► Report::error(msg, err) ─► exit(1)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                      |
//! |-------------------|----------------------------------------------------------|-----------------------------------------|
//! | **Supervision**   | Start/stop watching, fatal error policy.                 | [`AutoReloader`], [`AutoReloaderBuilder`] |
//! | **Configuration** | Immutable settings with normalized options.              | [`Config`], [`BackoffPolicy`]           |
//! | **Watching**      | Change notifications for one path.                       | [`ChangeSource`], [`NotifySource`]      |
//! | **Replacement**   | In-place process image replacement.                      | [`Replace`], [`Execve`]                 |
//! | **Reporting**     | Info/error logging capability.                           | [`Report`], [`LogReporter`], [`NoopReporter`] |
//! | **Events**        | Observable watch-loop lifecycle.                         | [`Event`], [`EventKind`]                |
//! | **Errors**        | Typed fatal and per-attempt errors.                      | [`ReloadError`], [`ExecError`]          |
//!
//! ## Logging
//! The default reporter, [`LogReporter`], writes through `tracing` only. Install
//! a subscriber (for example `tracing_subscriber::fmt`) before calling
//! [`AutoReloader::start`]; without one a fatal error terminates the process
//! with exit code 1 and leaves nothing in the logs.
//!
//! ## Optional features
//! - `launcher` (default): builds the `autoreload <command> [args...]` binary.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use autoreload::{AutoReloader, LogReporter};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     tracing_subscriber::fmt().init();
//!     let shutdown = CancellationToken::new();
//!
//!     let on_reload = shutdown.clone();
//!     AutoReloader::builder()
//!         .with_max_attempts(6)
//!         .with_logger(Some(Arc::new(LogReporter)))
//!         .with_on_reload(move || on_reload.cancel())
//!         .build()
//!         .start();
//!
//!     shutdown.cancelled().await;
//! }
//! ```
mod core;
mod error;
mod events;
mod exec;
mod policies;
mod reporters;
mod source;

// ---- Public re-exports ----

pub use crate::core::{
    AutoReloader, AutoReloaderBuilder, Config, DEFAULT_DEBOUNCE, DEFAULT_MAX_ATTEMPTS, ExitFn,
    LookupFn, OnReload,
};
pub use error::{ExecError, ReloadError};
pub use events::{Event, EventKind};
pub use exec::{Execve, Replace};
pub use policies::BackoffPolicy;
pub use reporters::{LogReporter, NoopReporter, Report};
pub use source::{ChangeEvent, ChangeSource, NotifySource, Subscription};
