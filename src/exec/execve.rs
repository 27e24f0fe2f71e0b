use std::convert::Infallible;
use std::ffi::{CString, NulError, OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use async_trait::async_trait;
use nix::unistd::execve;

use super::Replace;
use crate::error::ExecError;

/// Replaces the process with `execve(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Execve;

#[async_trait]
impl Replace for Execve {
    async fn replace(
        &self,
        path: &Path,
        argv: &[OsString],
        envv: &[(OsString, OsString)],
    ) -> ExecError {
        match exec(path, argv, envv) {
            Ok(never) => match never {},
            Err(e) => e,
        }
    }
}

fn exec(
    path: &Path,
    argv: &[OsString],
    envv: &[(OsString, OsString)],
) -> Result<Infallible, ExecError> {
    let path = cstring(path.as_os_str())?;
    let argv = argv
        .iter()
        .map(|arg| cstring(arg))
        .collect::<Result<Vec<_>, _>>()?;
    let envv = envv
        .iter()
        .map(|(key, value)| env_entry(key, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(execve(&path, &argv, &envv)?)
}

fn cstring(s: &OsStr) -> Result<CString, NulError> {
    CString::new(s.as_bytes())
}

/// Encodes one environment variable as `KEY=VALUE`.
fn env_entry(key: &OsStr, value: &OsStr) -> Result<CString, NulError> {
    let mut pair = Vec::with_capacity(key.len() + value.len() + 1);
    pair.extend_from_slice(key.as_bytes());
    pair.push(b'=');
    pair.extend_from_slice(value.as_bytes());
    CString::new(pair)
}
