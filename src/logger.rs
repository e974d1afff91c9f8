//! Logging contract consumed by the signal machinery.
//!
//! The crate only needs two severities. Callers can plug any sink that
//! satisfies [`Logger`], or disable logging entirely by handing the
//! facade `None`.

use tracing::info;

/// The two-method logging capability this crate consumes.
///
/// Implementations must not panic: these methods are called from the
/// dispatch path, including during shutdown.
pub trait Logger: Send + Sync {
    /// Records a message worth surfacing during normal operation.
    fn info(&self, message: &str);
    /// Records a diagnostic message.
    fn debug(&self, message: &str);
}

/// Default logger: `info` goes to the `tracing` sink, `debug` is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdLogger;

impl Logger for StdLogger {
    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn debug(&self, _message: &str) {}
}

// Logging is optional on the facade; these keep the call sites flat.

pub(crate) fn log_info(log: Option<&dyn Logger>, message: &str) {
    if let Some(log) = log {
        log.info(message);
    }
}

pub(crate) fn log_debug(log: Option<&dyn Logger>, message: &str) {
    if let Some(log) = log {
        log.debug(message);
    }
}
