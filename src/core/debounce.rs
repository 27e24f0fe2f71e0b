//! # Debouncer: collapses bursts of change notifications.
//!
//! Compilers rarely write an executable atomically; a single build may fire
//! several notifications (truncate, write, chmod). The debouncer waits until
//! the watched path has been quiet for a full window before letting a reload
//! cycle begin.
//!
//! ```text
//! change ──► window starts
//!   change ──► window restarts
//!     change ──► window restarts
//!                 ... quiet for `window` ──► Settled::Quiet
//! ```

use std::time::Duration;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::source::{Next, Subscription};

/// Outcome of waiting out a burst.
#[derive(Debug)]
pub(crate) enum Settled {
    /// The window elapsed with no further change.
    Quiet,
    /// The cancellation token fired first.
    Cancelled,
    /// The source failed or closed mid-burst.
    Fault(Next),
}

/// Pure trailing-edge debouncer.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Debouncer {
    window: Duration,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Waits until `sub` has been quiet for a full window.
    ///
    /// Call after the first change of a burst has been received.
    pub async fn settle(&self, sub: &mut Subscription, token: &CancellationToken) -> Settled {
        loop {
            select! {
                biased;
                _ = token.cancelled() => return Settled::Cancelled,
                next = sub.next() => match next {
                    Next::Change(ev) => {
                        tracing::trace!(path = %ev.path.display(), "debounce window restarted");
                    }
                    fault => return Settled::Fault(fault),
                },
                _ = time::sleep(self.window) => return Settled::Quiet,
            }
        }
    }
}
