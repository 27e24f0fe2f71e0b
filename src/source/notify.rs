use std::path::Path;

use notify::event::{AccessKind, AccessMode};
use notify::{EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::{ChangeEvent, ChangeSource, Subscription};
use crate::error::ReloadError;

/// Change source backed by the platform's recommended `notify` watcher.
///
/// Watches the path non-recursively. Read-only access events (opening or
/// mapping the executable) are filtered out; everything else counts as a change.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotifySource;

impl ChangeSource for NotifySource {
    fn subscribe(&self, path: &Path) -> Result<Subscription, ReloadError> {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();
        let watched = path.to_path_buf();

        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(ev) if is_change(&ev.kind) => {
                    let _ = event_tx.send(ChangeEvent::new(watched.clone()));
                }
                Ok(_) => {}
                Err(e) => {
                    let _ = error_tx.send(e);
                }
            })
            .map_err(|source| ReloadError::Watch {
                path: path.to_path_buf(),
                source,
            })?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|source| ReloadError::Watch {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "watching executable");
        Ok(Subscription::new(events, errors).with_guard(watcher))
    }
}

fn is_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        EventKind::Access(_) => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    #[test]
    fn test_access_events_are_filtered() {
        assert!(!is_change(&EventKind::Access(AccessKind::Open(
            AccessMode::Execute
        ))));
        assert!(!is_change(&EventKind::Access(AccessKind::Close(
            AccessMode::Read
        ))));
        assert!(is_change(&EventKind::Access(AccessKind::Close(
            AccessMode::Write
        ))));
        assert!(is_change(&EventKind::Modify(ModifyKind::Any)));
        assert!(is_change(&EventKind::Create(CreateKind::File)));
    }

    #[test]
    fn test_missing_path_fails_to_subscribe() {
        let err = NotifySource
            .subscribe(Path::new("/definitely/not/here/autoreload-test"))
            .unwrap_err();
        assert_eq!(err.as_label(), "reload_watch");
    }
}
