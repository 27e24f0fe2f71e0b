//! # Lifecycle events emitted by the watch loop.
//!
//! The [`EventKind`] enum classifies what the watch loop observed or did:
//! - **Watch events**: a change notification arrived for the watched path
//! - **Reload events**: a debounced reload cycle started, the hook ran,
//!   replacement attempts started or hit a busy executable
//! - **Terminal events**: the loop exited on cancellation
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! attempt numbers, delays and the path involved.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use autoreload::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::AttemptStarting)
//!     .with_path("/bin/app")
//!     .with_attempt(2)
//!     .with_delay(Duration::from_millis(250));
//!
//! assert_eq!(ev.kind, EventKind::AttemptStarting);
//! assert_eq!(ev.attempt, Some(2));
//! assert_eq!(ev.delay_ms, Some(250));
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of watch-loop events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The first change of a burst arrived while idle.
    ///
    /// Later changes of the same burst only restart the debounce window and
    /// are not published.
    ///
    /// Sets:
    /// - `path`: watched path
    ChangeObserved,

    /// The quiet window elapsed; a reload cycle begins.
    ///
    /// Sets:
    /// - `path`: watched path
    ReloadTriggered,

    /// The pre-reload hook returned (once per cycle).
    HookInvoked,

    /// A replacement attempt is about to run.
    ///
    /// Sets:
    /// - `path`: executable being exec'd
    /// - `attempt`: attempt number (1-based, per cycle)
    /// - `delay_ms`: delay waited before this attempt
    AttemptStarting,

    /// A replacement attempt reported a busy executable and will be retried.
    ///
    /// Sets:
    /// - `attempt`: attempt number
    /// - `reason`: error message
    AttemptBusy,

    /// The loop exited because the cancellation token fired.
    Cancelled,
}

/// Watch-loop event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Attempt count within the reload cycle (starting from 1).
    pub attempt: Option<u32>,
    /// Delay before the attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Path involved (watched path or exec'd executable).
    pub path: Option<Arc<Path>>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            attempt: None,
            delay_ms: None,
            path: None,
            reason: None,
        }
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a path.
    #[inline]
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(Arc::from(path.as_ref()));
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
