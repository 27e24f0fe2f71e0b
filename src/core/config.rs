//! # Reloader configuration.
//!
//! Provides [`Config`], the immutable settings a reloader is built with.
//! Fields are filled from defaults and then overridden, in order, by
//! [`AutoReloaderBuilder`](crate::AutoReloaderBuilder) options.
//!
//! ## Ambient defaults
//! The process argument vector and environment are captured once, when the
//! default configuration is created, and are never re-read afterwards. Tests
//! substitute them (and the lookup, watch, exec and exit capabilities) through
//! the builder.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::exec::{Execve, Replace};
use crate::policies::BackoffPolicy;
use crate::reporters::{LogReporter, Report};
use crate::source::{ChangeSource, NotifySource};

/// Default number of replacement attempts per reload cycle.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default quiet window that collapses bursts of change notifications.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Pre-reload hook.
pub type OnReload = Arc<dyn Fn() + Send + Sync>;

/// Resolves a command name or path to an absolute executable path.
pub type LookupFn = Arc<dyn Fn(&OsStr) -> Result<PathBuf, which::Error> + Send + Sync>;

/// Terminates the host process with the given exit code.
pub type ExitFn = Arc<dyn Fn(i32) + Send + Sync>;

/// Configuration of an [`AutoReloader`](crate::AutoReloader).
///
/// ## Field semantics
/// - `command`: executable to watch (`None` = the running executable, argv\[0\])
/// - `max_attempts`: replacement attempts per reload cycle (min 1)
/// - `debounce`: quiet window before a burst of changes triggers a reload
/// - `retry_backoff`: delay before each replacement attempt
/// - `args` / `envs`: what the replaced image is started with
#[derive(Clone)]
pub struct Config {
    /// Command name or path of the executable to watch.
    pub command: Option<OsString>,
    /// Maximum replacement attempts per reload cycle. Always `>= 1`.
    pub max_attempts: u32,
    /// Quiet window; every change inside it restarts the window.
    pub debounce: Duration,
    /// Delay before each replacement attempt.
    pub retry_backoff: BackoffPolicy,
    /// Capacity of the lifecycle event bus.
    pub bus_capacity: usize,
    /// Argument vector, argv\[0\] included.
    pub args: Vec<OsString>,
    /// Environment passed to the replaced image.
    pub envs: Vec<(OsString, OsString)>,

    pub(crate) on_reload: OnReload,
    pub(crate) reporter: Arc<dyn Report>,
    pub(crate) source: Arc<dyn ChangeSource>,
    pub(crate) replacer: Arc<dyn Replace>,
    pub(crate) lookup: LookupFn,
    pub(crate) exit: ExitFn,
}

impl Config {
    /// Returns the command whose executable is watched.
    ///
    /// Falls back to argv\[0\]; `None` when neither is available.
    pub fn watched_command(&self) -> Option<&OsStr> {
        self.command.as_deref().or_else(|| self.argv0())
    }

    /// Returns argv\[0\], the command the running process was started as.
    pub fn argv0(&self) -> Option<&OsStr> {
        self.args.first().map(OsString::as_os_str)
    }

    /// Returns the shared reporter.
    pub fn reporter(&self) -> &Arc<dyn Report> {
        &self.reporter
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `command = None` (watch the running executable)
    /// - `max_attempts = 10`
    /// - `debounce = 250ms`
    /// - `retry_backoff = BackoffPolicy::default()` (constant 250ms)
    /// - `args`, `envs` captured from the current process
    /// - reporter [`LogReporter`], source [`NotifySource`], replacer [`Execve`],
    ///   lookup via `which`, exit via [`std::process::exit`]
    fn default() -> Self {
        Self {
            command: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            debounce: DEFAULT_DEBOUNCE,
            retry_backoff: BackoffPolicy::default(),
            bus_capacity: 64,
            args: std::env::args_os().collect(),
            envs: std::env::vars_os().collect(),
            on_reload: Arc::new(|| {}),
            reporter: Arc::new(LogReporter),
            source: Arc::new(NotifySource),
            replacer: Arc::new(Execve),
            lookup: Arc::new(|name: &OsStr| which::which(name)),
            exit: Arc::new(exit_process),
        }
    }
}

fn exit_process(code: i32) {
    std::process::exit(code)
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("command", &self.command)
            .field("max_attempts", &self.max_attempts)
            .field("debounce", &self.debounce)
            .field("retry_backoff", &self.retry_backoff)
            .field("bus_capacity", &self.bus_capacity)
            .field("args", &self.args)
            .field("envs", &self.envs.len())
            .finish_non_exhaustive()
    }
}
