use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::{
    config::{Config, OnReload},
    reloader::AutoReloader,
};
use crate::{
    exec::Replace,
    policies::BackoffPolicy,
    reporters::{NoopReporter, Report},
    source::ChangeSource,
};

/// Builder for constructing an [`AutoReloader`].
///
/// Options are applied in call order; the last call wins. Invalid values are
/// normalized instead of rejected, so building never fails and never touches
/// the filesystem.
#[must_use]
pub struct AutoReloaderBuilder {
    cfg: Config,
}

impl Default for AutoReloaderBuilder {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AutoReloaderBuilder {
    /// Creates a new builder on top of the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    /// Sets the command (name or path) whose executable is watched.
    ///
    /// By default the currently running executable is watched.
    pub fn with_command(mut self, command: impl Into<OsString>) -> Self {
        self.cfg.command = Some(command.into());
        self
    }

    /// Sets the reporter. `None` disables logging.
    pub fn with_logger(mut self, reporter: Option<Arc<dyn Report>>) -> Self {
        self.cfg.reporter = reporter.unwrap_or_else(|| Arc::new(NoopReporter));
        self
    }

    /// Sets how many times a reload cycle tries to replace the process.
    ///
    /// Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: i64) -> Self {
        self.cfg.max_attempts = max_attempts.clamp(1, i64::from(u32::MAX)) as u32;
        self
    }

    /// Sets the hook executed once, right before the first replacement attempt
    /// of a reload cycle. Use it to shut the application down gracefully.
    pub fn with_on_reload<F>(mut self, on_reload: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.cfg.on_reload = Arc::new(on_reload);
        self
    }

    /// Sets a shared hook. `None` installs a no-op.
    pub fn with_on_reload_hook(mut self, on_reload: Option<OnReload>) -> Self {
        self.cfg.on_reload = on_reload.unwrap_or_else(|| Arc::new(|| {}));
        self
    }

    /// Sets the quiet window that collapses bursts of change notifications.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.cfg.debounce = debounce;
        self
    }

    /// Sets the delay policy applied before each replacement attempt.
    pub fn with_retry_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.cfg.retry_backoff = backoff;
        self
    }

    /// Replaces the argument vector (argv\[0\] included) handed to the new image.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.cfg.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the environment handed to the new image.
    pub fn with_envs<I, K, V>(mut self, envs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        self.cfg.envs = envs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Replaces the change source (default: [`NotifySource`](crate::NotifySource)).
    pub fn with_change_source(mut self, source: Arc<dyn ChangeSource>) -> Self {
        self.cfg.source = source;
        self
    }

    /// Replaces the process replacer (default: [`Execve`](crate::Execve)).
    pub fn with_replacer(mut self, replacer: Arc<dyn Replace>) -> Self {
        self.cfg.replacer = replacer;
        self
    }

    /// Replaces executable lookup (default: `which::which`).
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&OsStr) -> Result<PathBuf, which::Error> + Send + Sync + 'static,
    {
        self.cfg.lookup = Arc::new(lookup);
        self
    }

    /// Replaces process termination on fatal errors (default: [`std::process::exit`]).
    pub fn with_exit_handler<F>(mut self, exit: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.cfg.exit = Arc::new(exit);
        self
    }

    /// Builds the reloader. Nothing is watched until [`AutoReloader::start`].
    pub fn build(self) -> AutoReloader {
        AutoReloader::from_config(self.cfg)
    }
}
