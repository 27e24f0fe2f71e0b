use std::ffi::OsStr;
use std::path::PathBuf;

use crate::{core::Config, error::ReloadError, source::Subscription};

/// Runtime state of one supervision run.
///
/// Holds the resolved paths and the live change subscription. Dropping the
/// session releases the watch.
#[derive(Debug)]
pub(crate) struct Session {
    /// Executable whose changes trigger reloads.
    pub watch_path: PathBuf,
    /// Executable that replaces the process.
    pub exec_path: PathBuf,
    /// Live watch on `watch_path`.
    pub subscription: Subscription,
}

impl Session {
    /// Resolves both paths and subscribes to changes of the watched one.
    pub fn open(cfg: &Config) -> Result<Self, ReloadError> {
        let argv0 = cfg.argv0().unwrap_or_default();
        let command = cfg.watched_command().unwrap_or_default();

        let watch_path = look_path(cfg, command)?;
        let exec_path = look_path(cfg, argv0)?;
        let subscription = cfg.source.subscribe(&watch_path)?;

        tracing::debug!(
            watch = %watch_path.display(),
            exec = %exec_path.display(),
            "supervision session opened"
        );
        Ok(Self {
            watch_path,
            exec_path,
            subscription,
        })
    }
}

fn look_path(cfg: &Config, name: &OsStr) -> Result<PathBuf, ReloadError> {
    (cfg.lookup)(name).map_err(|source| ReloadError::Lookup {
        name: name.to_string_lossy().into_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AutoReloaderBuilder;

    #[test]
    fn test_unresolvable_command_fails() {
        let reloader = AutoReloaderBuilder::default()
            .with_args(["/bin/app"])
            .with_command("missing")
            .with_lookup(|name| {
                if name == "missing" {
                    Err(which::Error::CannotFindBinaryPath)
                } else {
                    Ok(PathBuf::from(name))
                }
            })
            .build();

        let err = Session::open(reloader.config()).unwrap_err();
        match err {
            ReloadError::Lookup { name, .. } => assert_eq!(name, "missing"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
