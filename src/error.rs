//! Crate error types.

use thiserror::Error;

/// Errors from setting up the background signal listener.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The OS rejected the signal subscription.
    #[error("failed to subscribe to signals: {0}")]
    Subscribe(#[source] std::io::Error),
    /// The dispatch thread could not be spawned.
    #[error("failed to spawn signal dispatch thread: {0}")]
    SpawnThread(#[source] std::io::Error),
}
