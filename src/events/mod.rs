//! Watch-loop events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: `core::watch::WatchLoop`.
//! - **Consumers**: receivers handed out by `AutoReloader::subscribe()`.

mod bus;
mod event;

pub(crate) use bus::Bus;
pub use event::{Event, EventKind};
