//! # autoreload launcher
//!
//! Runs a command and restarts it whenever its executable changes.
//!
//! ```text
//! autoreload ./target/debug/server --port 8000
//!   ├─► spawn child (inherited stdio)
//!   ├─► sleep 250ms (spawning touches the executable)
//!   ├─► AutoReloader watching the child's executable
//!   │     on_reload: mark reloading, SIGKILL child
//!   └─► wait for child
//!         ├─ reloading → wait to be replaced by a fresh launcher
//!         └─ otherwise → exit with the child's exit code
//! ```
//!
//! The launcher re-executes itself with its own arguments, which spawns a fresh
//! child from the rebuilt executable.

use std::ffi::OsString;
use std::process::ExitStatus;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use autoreload::{AutoReloader, LogReporter, Report};
use clap::Parser;
use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::process::Command;
use tracing_subscriber::EnvFilter;

/// Restart a command whenever its executable changes (local development only).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Maximum exec attempts per reload (values below 1 count as 1)
    #[arg(long, env = "AUTORELOAD_MAX_ATTEMPTS", default_value_t = 10)]
    max_attempts: i64,

    /// Do not log reload activity
    #[arg(short, long, env = "AUTORELOAD_QUIET")]
    quiet: bool,

    /// Command to run, followed by its arguments
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    command: Vec<OsString>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let (program, rest) = args
        .command
        .split_first()
        .context("must supply a command to autoreload")?;
    let path = which::which(program)
        .with_context(|| format!("cannot find executable: {}", program.to_string_lossy()))?;

    let mut child = Command::new(&path)
        .args(rest)
        .spawn()
        .context("failed to spawn process")?;
    let pid = child.id().context("spawned process exited before it could be watched")?;

    tokio::time::sleep(Duration::from_millis(250)).await;

    let reloading = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&reloading);
    let reporter: Option<Arc<dyn Report>> = if args.quiet {
        None
    } else {
        Some(Arc::new(LogReporter))
    };

    AutoReloader::builder()
        .with_command(program.clone())
        .with_max_attempts(args.max_attempts)
        .with_logger(reporter)
        .with_on_reload(move || {
            flag.store(true, Ordering::SeqCst);
            tracing::info!(pid, "killing spawned process");
            match kill(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                Ok(()) | Err(Errno::ESRCH) => {}
                Err(e) => {
                    tracing::error!(pid, error = %e, "failed to kill spawned process");
                    std::process::exit(1);
                }
            }
        })
        .build()
        .start();

    let status = child
        .wait()
        .await
        .context("failed to wait for spawned process")?;

    match exit_code(status, reloading.load(Ordering::SeqCst)) {
        Some(code) => std::process::exit(code),
        // The reloader replaces this process, or exits on failure.
        None => std::future::pending::<Result<()>>().await,
    }
}

/// Exit code the launcher mirrors for a finished child.
///
/// `None` while a reload is under way: the child was killed on purpose.
/// A child terminated by a signal has no code and maps to 1.
fn exit_code(status: ExitStatus, reloading: bool) -> Option<i32> {
    if reloading {
        return None;
    }
    Some(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_command_keeps_hyphen_args() {
        let args = Args::try_parse_from([
            "autoreload",
            "--max-attempts",
            "3",
            "server",
            "--port",
            "8000",
        ])
        .unwrap();
        assert_eq!(args.max_attempts, 3);
        assert_eq!(
            args.command,
            vec![
                OsString::from("server"),
                OsString::from("--port"),
                OsString::from("8000")
            ]
        );
    }

    #[test]
    fn test_command_is_required() {
        assert!(Args::try_parse_from(["autoreload"]).is_err());
    }

    #[test]
    fn test_exit_code_mirrors_child() {
        use std::os::unix::process::ExitStatusExt;

        // Wait statuses: exit code in the high byte, signal number in the low bits.
        let exited_7 = ExitStatus::from_raw(7 << 8);
        let exited_0 = ExitStatus::from_raw(0);
        let killed = ExitStatus::from_raw(Signal::SIGKILL as i32);

        assert_eq!(exit_code(exited_7, false), Some(7));
        assert_eq!(exit_code(exited_0, false), Some(0));
        assert_eq!(exit_code(killed, false), Some(1));
    }

    #[test]
    fn test_exit_code_absorbs_reload_kill() {
        use std::os::unix::process::ExitStatusExt;

        let killed = ExitStatus::from_raw(Signal::SIGKILL as i32);
        assert_eq!(exit_code(killed, true), None);
        assert_eq!(exit_code(ExitStatus::from_raw(0), true), None);
    }
}
