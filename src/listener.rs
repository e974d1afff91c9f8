//! Background listener lifecycle: subscription plus cancellation handle.

use std::sync::Mutex;
use std::thread::JoinHandle;

use signal_hook::consts::FORBIDDEN;
use signal_hook::iterator::Handle;

use crate::Signal;

/// Cancellation handle for one listener subscription.
///
/// Returned by [`Handlers::start_listen`](crate::Handlers::start_listen).
/// Its lifetime is independent of the facade: listening can be started and
/// stopped multiple times over the process lifetime.
pub struct ListenerHandle {
    handle: Handle,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl ListenerHandle {
    pub(crate) fn new(handle: Handle, thread: JoinHandle<()>) -> Self {
        Self {
            handle,
            thread: Mutex::new(Some(thread)),
        }
    }

    /// Unsubscribes from the OS-signal source and waits for the dispatch
    /// thread to finish its current signal and exit.
    ///
    /// Idempotent: the signal-hook handle tolerates repeated closes and
    /// the thread is joined exactly once. Signals delivered after this
    /// returns no longer reach the registry.
    pub fn cancel(&self) {
        self.handle.close();
        let thread = self
            .thread
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(thread) = thread {
            let _ = thread.join();
        }
    }
}

/// Every signal the process can subscribe to. SIGKILL, SIGSTOP and the
/// synchronous fault signals are excluded; signal-hook refuses them.
pub(crate) fn catchable_signals() -> Vec<Signal> {
    (1..32).filter(|sig| !FORBIDDEN.contains(sig)).collect()
}
