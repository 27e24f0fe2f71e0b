//! # Change sources: where "the executable changed" notifications come from.
//!
//! A [`ChangeSource`] turns a path into a live [`Subscription`]: a stream of
//! opaque change events plus a parallel stream of watch errors. Dropping the
//! subscription releases whatever OS resources back it.
//!
//! ## Built-in sources
//! - [`NotifySource`] (default) uses the `notify` crate's recommended watcher.
//!
//! ## Custom sources
//! Tests and embedders can hand-feed a subscription through channels:
//! ```rust
//! use std::path::Path;
//! use autoreload::{ChangeEvent, ChangeSource, ReloadError, Subscription};
//! use tokio::sync::mpsc;
//!
//! struct Manual;
//!
//! impl ChangeSource for Manual {
//!     fn subscribe(&self, path: &Path) -> Result<Subscription, ReloadError> {
//!         let (tx, events) = mpsc::unbounded_channel();
//!         let (_err_tx, errors) = mpsc::unbounded_channel();
//!         tx.send(ChangeEvent::new(path)).ok();
//!         Ok(Subscription::new(events, errors).with_guard((tx, _err_tx)))
//!     }
//! }
//! ```

mod notify;

use std::any::Any;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::{select, sync::mpsc, time};

use crate::error::ReloadError;

pub use self::notify::NotifySource;

/// Opaque "this path changed" signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The watched path the event belongs to.
    pub path: PathBuf,
}

impl ChangeEvent {
    /// Creates an event for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Live watch on one path.
///
/// Owned exclusively by the watch loop; dropping it ends the watch.
pub struct Subscription {
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    errors: mpsc::UnboundedReceiver<::notify::Error>,
    events_closed: bool,
    errors_closed: bool,
    guard: Option<Box<dyn Any + Send>>,
}

/// What a subscription produced next.
#[derive(Debug)]
pub(crate) enum Next {
    Change(ChangeEvent),
    Error(::notify::Error),
    Closed,
}

impl Subscription {
    /// Creates a subscription from an event stream and an error stream.
    pub fn new(
        events: mpsc::UnboundedReceiver<ChangeEvent>,
        errors: mpsc::UnboundedReceiver<::notify::Error>,
    ) -> Self {
        Self {
            events,
            errors,
            events_closed: false,
            errors_closed: false,
            guard: None,
        }
    }

    /// Ties the lifetime of `guard` (e.g. the OS watcher) to this subscription.
    pub fn with_guard(mut self, guard: impl Any + Send) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Releases the watch: closes both streams and drops the guard.
    pub fn unsubscribe(mut self) {
        self.events.close();
        self.errors.close();
        drop(self.guard.take());
    }

    /// Waits for the next change or watch error.
    ///
    /// A closed error stream is tolerated; a closed event stream yields
    /// [`Next::Closed`]. Cancel-safe.
    pub(crate) async fn next(&mut self) -> Next {
        loop {
            if self.events_closed {
                return Next::Closed;
            }
            select! {
                biased;
                ev = self.events.recv() => match ev {
                    Some(ev) => return Next::Change(ev),
                    None => self.events_closed = true,
                },
                err = self.errors.recv(), if !self.errors_closed => match err {
                    Some(e) => return Next::Error(e),
                    None => self.errors_closed = true,
                },
            }
        }
    }

    /// Sleeps for `delay`, discarding change events that arrive meanwhile.
    ///
    /// Watch errors are left queued.
    pub(crate) async fn swallow_for(&mut self, delay: Duration) {
        let deadline = time::sleep(delay);
        tokio::pin!(deadline);

        loop {
            select! {
                _ = &mut deadline => return,
                ev = self.events.recv(), if !self.events_closed => {
                    if ev.is_none() {
                        self.events_closed = true;
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("guarded", &self.guard.is_some())
            .finish_non_exhaustive()
    }
}

/// Produces change subscriptions for a path.
pub trait ChangeSource: Send + Sync + 'static {
    /// Starts watching `path`.
    ///
    /// Failing to establish the watch is reported as [`ReloadError::Watch`].
    fn subscribe(&self, path: &Path) -> Result<Subscription, ReloadError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_unsubscribe_releases_guard_and_streams() {
        let (tx, events) = mpsc::unbounded_channel();
        let (err_tx, errors) = mpsc::unbounded_channel::<::notify::Error>();
        let watcher = Arc::new(());
        let sub = Subscription::new(events, errors).with_guard(Arc::clone(&watcher));
        assert_eq!(Arc::strong_count(&watcher), 2);

        sub.unsubscribe();

        assert_eq!(Arc::strong_count(&watcher), 1);
        assert!(tx.send(ChangeEvent::new("/bin/app")).is_err());
        assert!(err_tx.is_closed());
    }

    #[tokio::test]
    async fn test_closed_error_stream_is_tolerated() {
        let (tx, events) = mpsc::unbounded_channel();
        let (err_tx, errors) = mpsc::unbounded_channel::<::notify::Error>();
        let mut sub = Subscription::new(events, errors);
        drop(err_tx);
        tx.send(ChangeEvent::new("/bin/app")).unwrap();

        assert!(matches!(sub.next().await, Next::Change(_)));
        drop(tx);
        assert!(matches!(sub.next().await, Next::Closed));
    }
}
