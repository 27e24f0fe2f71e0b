//! Runtime core: configuration, supervision and the reload state machine.
//!
//! The public API from this module is [`AutoReloader`], its
//! [`AutoReloaderBuilder`] and the [`Config`] they share.
//!
//! Internal modules:
//! - [`config`]: immutable settings and their defaults;
//! - [`builder`]: option application and normalization;
//! - [`reloader`]: start/stop, detached task hosting, fatal reporting;
//! - [`session`]: path resolution and change subscription;
//! - [`debounce`]: collapses bursts of change notifications;
//! - [`watch`]: the Idle → Debouncing → Reloading state machine.

mod builder;
mod config;
mod debounce;
mod reloader;
mod session;
mod watch;

pub use builder::AutoReloaderBuilder;
pub use config::{Config, DEFAULT_DEBOUNCE, DEFAULT_MAX_ATTEMPTS, ExitFn, LookupFn, OnReload};
pub use reloader::AutoReloader;
