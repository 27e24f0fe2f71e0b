//! # AutoReloader: public handle to one supervision run.
//!
//! ```text
//! AutoReloader::start()
//!   ├─► Session::open(cfg)          resolve watched + own executable, subscribe
//!   │     └─ Err ──► report ──► exit(1)
//!   └─► spawn WatchLoop::run(token)  (returns immediately)
//!         └─ Err ──► report ──► exit(1)
//!
//! AutoReloader::stop() ──► token.cancel()   (idempotent)
//! ```
//!
//! The watch loop runs on the caller's tokio runtime when there is one;
//! otherwise it gets a dedicated thread with a current-thread runtime, so
//! synchronous programs can embed the reloader as well.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::{runtime, sync::broadcast};
use tokio_util::sync::CancellationToken;

use super::{builder::AutoReloaderBuilder, config::Config, session::Session, watch::WatchLoop};
use crate::{
    error::ReloadError,
    events::{Bus, Event},
};

/// Restarts the process when its executable changes.
///
/// Intended for local development only.
///
/// Fatal errors are reported through the configured [`Report`](crate::Report)
/// right before the process exits. The default [`LogReporter`](crate::LogReporter)
/// emits `tracing` events, so a subscriber must be installed for them to show up.
///
/// ## Example
/// ```no_run
/// use autoreload::AutoReloader;
///
/// #[tokio::main]
/// async fn main() {
///     tracing_subscriber::fmt().init();
///     AutoReloader::builder()
///         .with_max_attempts(6)
///         .with_on_reload(|| println!("shutting down before reload"))
///         .build()
///         .start();
///
///     tokio::signal::ctrl_c().await.ok();
/// }
/// ```
#[derive(Clone)]
pub struct AutoReloader {
    cfg: Arc<Config>,
    token: CancellationToken,
    bus: Bus,
    started: Arc<AtomicBool>,
}

impl Default for AutoReloader {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AutoReloader {
    /// Returns a builder with default configuration.
    pub fn builder() -> AutoReloaderBuilder {
        AutoReloaderBuilder::default()
    }

    pub(crate) fn from_config(cfg: Config) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        Self {
            cfg: Arc::new(cfg),
            token: CancellationToken::new(),
            bus,
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the configuration this reloader was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Subscribes to watch-loop lifecycle events.
    ///
    /// Only events published after this call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Starts watching the executable in the background.
    ///
    /// Never blocks. Failing to resolve the executables or to watch the file
    /// is reported and terminates the process, as does any fatal error of the
    /// watch loop later on. Calling `start` again has no effect.
    pub fn start(&self) {
        if let Err(err) = self.try_start() {
            fatal(&self.cfg, &err);
        }
    }

    /// Like [`AutoReloader::start`], but startup errors are returned instead
    /// of terminating the process.
    ///
    /// Fatal errors of the running watch loop still terminate the process.
    pub fn try_start(&self) -> Result<(), ReloadError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let res = Session::open(&self.cfg).and_then(|session| {
            let watch = WatchLoop::new(Arc::clone(&self.cfg), session, self.bus.clone());
            let cfg = Arc::clone(&self.cfg);
            let token = self.token.clone();

            spawn_detached(async move {
                if let Err(err) = watch.run(token).await {
                    fatal(&cfg, &err);
                }
            })
        });

        if res.is_err() {
            self.started.store(false, Ordering::SeqCst);
        }
        res
    }

    /// Stops watching. Safe to call any number of times, before or after the
    /// loop has exited. Does not interrupt a reload cycle already under way.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Returns `true` once [`AutoReloader::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl std::fmt::Debug for AutoReloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoReloader")
            .field("cfg", &self.cfg)
            .field("started", &self.started.load(Ordering::Relaxed))
            .field("stopped", &self.token.is_cancelled())
            .finish()
    }
}

/// Reports `err` once and terminates through the configured exit handler.
fn fatal(cfg: &Config, err: &ReloadError) {
    cfg.reporter.error(&err.context(), err);
    (cfg.exit)(1);
}

fn spawn_detached<F>(fut: F) -> Result<(), ReloadError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(handle) = runtime::Handle::try_current() {
        handle.spawn(fut);
        return Ok(());
    }

    let rt = runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(ReloadError::Runtime)?;
    std::thread::Builder::new()
        .name("autoreload".into())
        .spawn(move || rt.block_on(fut))
        .map_err(ReloadError::Runtime)?;
    Ok(())
}
