//! # Example: embedded
//!
//! Demonstrates embedding an [`AutoReloader`] in a long-running service.
//!
//! A worker ticks once per second. When the executable is rebuilt, the
//! reload hook cancels the worker; once it is gone the process is replaced by
//! the new build with the same arguments.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► AutoReloader::start()   (watches this executable)
//!   ├─► spawn ticker(worker_token)
//!   └─► wait: Ctrl-C | worker stopped
//!
//! rebuild ─► changes debounced ─► on_reload(): worker_token.cancel()
//!                               ─► execve(self)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example embedded
//! # in another terminal, rebuild:
//! touch demos/embedded.rs && cargo build --example embedded
//! ```

use std::sync::Arc;
use std::time::Duration;

use autoreload::{AutoReloader, LogReporter};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Keep this off outside local development.
    let enabled = std::env::var_os("AUTORELOAD_DISABLE").is_none();
    let worker_token = CancellationToken::new();

    let reloader = AutoReloader::builder()
        .with_max_attempts(6)
        .with_logger(Some(Arc::new(LogReporter)))
        .with_on_reload({
            let token = worker_token.clone();
            move || {
                tracing::info!("received change event, shutting down worker");
                token.cancel();
            }
        })
        .build();

    if enabled {
        tracing::info!("auto-reload is enabled");
        reloader.start();
    }

    let worker = tokio::spawn(ticker(worker_token.clone()));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received interrupt signal, shutting down");
            reloader.stop();
            worker_token.cancel();
        }
        _ = worker_token.cancelled() => {}
    }

    let _ = worker.await;
    // On reload the process image is replaced while we park here.
    if reloader.is_stopped() {
        return;
    }
    std::future::pending::<()>().await;
}

async fn ticker(token: CancellationToken) {
    let mut n: u64 = 0;
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                n += 1;
                tracing::info!(tick = n, "working");
            }
        }
    }
    tracing::info!("worker stopped");
}
