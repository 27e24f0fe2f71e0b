use crate::reporters::Report;

/// Reporter that discards everything. Selected when logging is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Report for NoopReporter {
    fn info(&self, _msg: &str) {}

    fn error(&self, _msg: &str, _err: &(dyn std::error::Error + 'static)) {}
}
