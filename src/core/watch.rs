//! # WatchLoop: the reload state machine.
//!
//! Watches one executable and replaces the process when it changes.
//!
//! ## States
//! ```text
//!            change                 quiet window elapsed
//!   Idle ─────────────► Debouncing ─────────────────────► Reloading
//!    ▲                   │    ▲                              │
//!    │                   └────┘ change (window restarts)     ├─► exec ok ─► (process replaced)
//!    │                                                       ├─► busy    ─► next attempt
//!    │                                                       ├─► other   ─► Err(Exec)
//!    │                                                       └─► k busy  ─► Err(MaxAttempts)
//!    │
//!    └─ cancellation at Idle / after a change / after the window ─► Cancelled (Ok)
//!       watch error while Idle or Debouncing ─────────────────────► Err(Watch)
//! ```
//!
//! ## Reloading
//! ```text
//! for attempt in 1..=max_attempts {
//!   ├─► sleep(retry_backoff.next(attempt - 1)), swallowing change events
//!   ├─► attempt == 1 → on_reload()
//!   └─► replacer.replace(exec_path, args, envs)
//!         ├─ never resolves   → the process image was replaced
//!         ├─ Busy             → continue
//!         └─ anything else    → Err(Exec)
//! }
//! Err(MaxAttempts)
//! ```
//!
//! ## Rules
//! - Exactly one hook call per cycle, before the first attempt, never on retries
//! - Cancellation is **not** observed while Reloading
//! - Watch errors arriving while Reloading are ignored: the process is about to
//!   be replaced or terminated either way

use std::sync::Arc;

use tokio::select;
use tokio_util::sync::CancellationToken;

use super::{
    config::Config,
    debounce::{Debouncer, Settled},
    session::Session,
};
use crate::{
    error::ReloadError,
    events::{Bus, Event, EventKind},
    source::Next,
};

/// Message reported when a debounced change starts a reload cycle.
pub(crate) const RELOAD_TRIGGERED: &str = "Executable changed; reloading process";

/// Drives one supervision session until cancellation or a fatal error.
pub(crate) struct WatchLoop {
    cfg: Arc<Config>,
    session: Session,
    debouncer: Debouncer,
    bus: Bus,
}

impl WatchLoop {
    pub fn new(cfg: Arc<Config>, session: Session, bus: Bus) -> Self {
        let debouncer = Debouncer::new(cfg.debounce);
        Self {
            cfg,
            session,
            debouncer,
            bus,
        }
    }

    /// Runs until `token` is cancelled (`Ok`) or a fatal error occurs (`Err`).
    ///
    /// A successful replacement never returns.
    pub async fn run(mut self, token: CancellationToken) -> Result<(), ReloadError> {
        loop {
            if token.is_cancelled() {
                break;
            }

            // Idle
            let next = select! {
                biased;
                _ = token.cancelled() => break,
                next = self.session.subscription.next() => next,
            };
            self.observe(next)?;
            if token.is_cancelled() {
                break;
            }

            // Debouncing
            match self
                .debouncer
                .settle(&mut self.session.subscription, &token)
                .await
            {
                Settled::Quiet => {}
                Settled::Cancelled => break,
                Settled::Fault(next) => return Err(self.fault(next)),
            }
            if token.is_cancelled() {
                break;
            }

            // Reloading
            return Err(self.reload().await);
        }

        tracing::debug!(path = %self.session.watch_path.display(), "watch loop cancelled");
        self.session.subscription.unsubscribe();
        self.bus.publish(Event::new(EventKind::Cancelled));
        Ok(())
    }

    fn observe(&self, next: Next) -> Result<(), ReloadError> {
        match next {
            Next::Change(ev) => {
                tracing::debug!(path = %ev.path.display(), "change observed");
                self.bus.publish(Event::new(EventKind::ChangeObserved).with_path(&ev.path));
                Ok(())
            }
            fault => Err(self.fault(fault)),
        }
    }

    fn fault(&self, next: Next) -> ReloadError {
        let path = self.session.watch_path.clone();
        match next {
            Next::Error(source) => ReloadError::Watch { path, source },
            Next::Change(_) | Next::Closed => ReloadError::SourceClosed { path },
        }
    }

    /// Runs one reload cycle. Only returns on failure.
    async fn reload(&mut self) -> ReloadError {
        let cfg = Arc::clone(&self.cfg);
        let exec_path = self.session.exec_path.clone();

        cfg.reporter.info(RELOAD_TRIGGERED);
        self.bus.publish(
            Event::new(EventKind::ReloadTriggered).with_path(&self.session.watch_path),
        );

        let mut attempt: u32 = 0;
        while attempt < cfg.max_attempts {
            let delay = cfg.retry_backoff.next(attempt);
            self.session.subscription.swallow_for(delay).await;
            attempt += 1;

            if attempt == 1 {
                (cfg.on_reload)();
                self.bus.publish(Event::new(EventKind::HookInvoked));
            }

            tracing::debug!(attempt, path = %exec_path.display(), "replacing process");
            self.bus.publish(
                Event::new(EventKind::AttemptStarting)
                    .with_path(&exec_path)
                    .with_attempt(attempt)
                    .with_delay(delay),
            );

            let err = cfg.replacer.replace(&exec_path, &cfg.args, &cfg.envs).await;
            if !err.is_retryable() {
                return ReloadError::Exec {
                    path: exec_path,
                    source: err,
                };
            }
            self.bus.publish(
                Event::new(EventKind::AttemptBusy)
                    .with_attempt(attempt)
                    .with_reason(err.to_string()),
            );
        }

        ReloadError::MaxAttempts { attempts: attempt }
    }
}
