use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use autoreload::{
    AutoReloader, AutoReloaderBuilder, ChangeEvent, ChangeSource, EventKind, ExecError, ReloadError,
    Replace, Report, Subscription,
};
use tokio::sync::mpsc;

/// Hands out one pre-built subscription.
struct ChannelSource {
    sub: Mutex<Option<Subscription>>,
    subscribed: AtomicU32,
}

impl ChangeSource for ChannelSource {
    fn subscribe(&self, _path: &Path) -> Result<Subscription, ReloadError> {
        self.subscribed.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .sub
            .lock()
            .unwrap()
            .take()
            .expect("subscribed more than once"))
    }
}

#[derive(Clone, Copy)]
enum Outcome {
    Busy,
    Replaced,
}

struct ScriptedReplacer {
    script: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    calls: AtomicU32,
}

#[async_trait]
impl Replace for ScriptedReplacer {
    async fn replace(
        &self,
        _path: &Path,
        _argv: &[OsString],
        _envv: &[(OsString, OsString)],
    ) -> ExecError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);
        match next {
            Outcome::Busy => ExecError::Busy,
            Outcome::Replaced => std::future::pending().await,
        }
    }
}

#[derive(Default)]
struct RecordingReporter {
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl Report for RecordingReporter {
    fn info(&self, msg: &str) {
        self.infos.lock().unwrap().push(msg.to_string());
    }

    fn error(&self, msg: &str, err: &(dyn std::error::Error + 'static)) {
        self.errors.lock().unwrap().push(format!("{msg}: {err}"));
    }
}

struct Fixture {
    events: mpsc::UnboundedSender<ChangeEvent>,
    errors: mpsc::UnboundedSender<notify::Error>,
    source: Arc<ChannelSource>,
    replacer: Arc<ScriptedReplacer>,
    reporter: Arc<RecordingReporter>,
    hooks: Arc<AtomicU32>,
    exits: Arc<Mutex<Vec<i32>>>,
}

impl Fixture {
    fn new(script: impl IntoIterator<Item = Outcome>, fallback: Outcome) -> Self {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (errors, errors_rx) = mpsc::unbounded_channel();
        Self {
            events,
            errors,
            source: Arc::new(ChannelSource {
                sub: Mutex::new(Some(Subscription::new(events_rx, errors_rx))),
                subscribed: AtomicU32::new(0),
            }),
            replacer: Arc::new(ScriptedReplacer {
                script: Mutex::new(script.into_iter().collect()),
                fallback,
                calls: AtomicU32::new(0),
            }),
            reporter: Arc::new(RecordingReporter::default()),
            hooks: Arc::new(AtomicU32::new(0)),
            exits: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn builder(&self) -> AutoReloaderBuilder {
        let hooks = Arc::clone(&self.hooks);
        let exits = Arc::clone(&self.exits);
        let source: Arc<dyn ChangeSource> = self.source.clone();
        let replacer: Arc<dyn Replace> = self.replacer.clone();
        let reporter: Arc<dyn Report> = self.reporter.clone();
        AutoReloader::builder()
            .with_args(["/bin/app"])
            .with_command("/bin/app")
            .with_lookup(|name| Ok(PathBuf::from(name)))
            .with_change_source(source)
            .with_replacer(replacer)
            .with_logger(Some(reporter))
            .with_on_reload(move || {
                hooks.fetch_add(1, Ordering::SeqCst);
            })
            .with_exit_handler(move |code| exits.lock().unwrap().push(code))
    }

    fn change(&self) {
        self.events.send(ChangeEvent::new("/bin/app")).unwrap();
    }

    fn calls(&self) -> u32 {
        self.replacer.calls.load(Ordering::SeqCst)
    }

    fn hooks(&self) -> u32 {
        self.hooks.load(Ordering::SeqCst)
    }

    fn infos(&self) -> Vec<String> {
        self.reporter.infos.lock().unwrap().clone()
    }

    fn errors(&self) -> Vec<String> {
        self.reporter.errors.lock().unwrap().clone()
    }

    fn exits(&self) -> Vec<i32> {
        self.exits.lock().unwrap().clone()
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_secs(10)).await;
}

#[tokio::test(start_paused = true)]
async fn reload_succeeds_on_third_attempt() {
    let fx = Fixture::new([Outcome::Busy, Outcome::Busy], Outcome::Replaced);
    let reloader = fx.builder().with_max_attempts(3).build();

    reloader.start();
    fx.change();
    settle().await;

    assert_eq!(fx.calls(), 3);
    assert_eq!(fx.hooks(), 1);
    assert_eq!(fx.infos().len(), 1);
    assert!(fx.infos()[0].contains("reloading"));
    assert!(fx.errors().is_empty());
    assert!(fx.exits().is_empty());
}

#[tokio::test(start_paused = true)]
async fn exhausted_attempts_are_fatal() {
    let fx = Fixture::new([], Outcome::Busy);
    let reloader = fx.builder().with_max_attempts(2).build();

    reloader.start();
    fx.change();
    settle().await;

    assert_eq!(fx.calls(), 2);
    assert_eq!(fx.hooks(), 1);
    let errors = fx.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("max attempts reached"), "{errors:?}");
    assert_eq!(fx.exits(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn non_positive_max_attempts_means_one() {
    for max_attempts in [0, -3] {
        let fx = Fixture::new([], Outcome::Busy);
        let reloader = fx.builder().with_max_attempts(max_attempts).build();

        reloader.start();
        fx.change();
        settle().await;

        assert_eq!(fx.calls(), 1, "max_attempts = {max_attempts}");
        assert_eq!(fx.exits(), vec![1]);
    }
}

#[tokio::test(start_paused = true)]
async fn absent_reporter_and_hook_are_noops() {
    let fx = Fixture::new([], Outcome::Busy);
    let reloader = fx
        .builder()
        .with_logger(None)
        .with_on_reload_hook(None)
        .with_max_attempts(2)
        .build();

    reloader.start();
    fx.change();
    settle().await;

    assert_eq!(fx.calls(), 2);
    assert_eq!(fx.hooks(), 0);
    assert!(fx.infos().is_empty());
    assert!(fx.errors().is_empty());
    assert_eq!(fx.exits(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn stop_before_change_prevents_reload() {
    let fx = Fixture::new([], Outcome::Replaced);
    let reloader = fx.builder().build();
    let mut rx = reloader.subscribe();

    reloader.start();
    reloader.stop();
    fx.change();
    settle().await;

    assert_eq!(fx.calls(), 0);
    assert_eq!(fx.hooks(), 0);
    assert!(fx.exits().is_empty());

    let ev = rx.try_recv().unwrap();
    assert_eq!(ev.kind, EventKind::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent() {
    let fx = Fixture::new([], Outcome::Replaced);
    let reloader = fx.builder().build();

    reloader.stop();
    reloader.stop();
    reloader.start();
    settle().await;
    reloader.stop();
    reloader.clone().stop();

    assert!(reloader.is_stopped());
    assert_eq!(fx.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn start_is_idempotent() {
    let fx = Fixture::new([], Outcome::Replaced);
    let reloader = fx.builder().build();

    reloader.start();
    reloader.start();
    reloader.try_start().unwrap();

    assert_eq!(fx.source.subscribed.load(Ordering::SeqCst), 1);
    reloader.stop();
}

#[tokio::test(start_paused = true)]
async fn watch_error_is_fatal() {
    let fx = Fixture::new([], Outcome::Replaced);
    let reloader = fx.builder().build();

    reloader.start();
    fx.errors.send(notify::Error::generic("watch lost")).unwrap();
    settle().await;

    assert_eq!(fx.calls(), 0);
    let errors = fx.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Error watching file"), "{errors:?}");
    assert_eq!(fx.exits(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn unresolvable_executable_is_fatal_at_start() {
    let fx = Fixture::new([], Outcome::Replaced);
    let reloader = fx
        .builder()
        .with_lookup(|_| Err(which::Error::CannotFindBinaryPath))
        .build();

    let err = reloader.try_start().unwrap_err();
    assert_eq!(err.as_label(), "reload_lookup");
    assert!(fx.exits().is_empty());

    reloader.start();
    let errors = fx.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Cannot find executable: /bin/app"), "{errors:?}");
    assert_eq!(fx.exits(), vec![1]);
    assert_eq!(fx.source.subscribed.load(Ordering::SeqCst), 0);
}

#[test]
fn start_without_runtime_hosts_its_own() {
    let fx = Fixture::new([], Outcome::Replaced);
    let reloader = fx.builder().build();
    let mut rx = reloader.subscribe();

    reloader.start();
    reloader.stop();

    let ev = rx.blocking_recv().unwrap();
    assert_eq!(ev.kind, EventKind::Cancelled);
    assert!(fx.exits().is_empty());
}
