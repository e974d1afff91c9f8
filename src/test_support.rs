//! Recording doubles shared by the unit tests.

use std::sync::Arc;
use std::sync::Mutex;

use crate::logger::Logger;

/// Logger that records every line for later assertions. Clones share the
/// same storage, so a clone can be kept for inspection after the original
/// moves into the facade.
#[derive(Clone, Default)]
pub struct RecordingLogger {
    infos: Arc<Mutex<Vec<String>>>,
    debugs: Arc<Mutex<Vec<String>>>,
}

impl RecordingLogger {
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn debugs(&self) -> Vec<String> {
        self.debugs.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn debug(&self, message: &str) {
        self.debugs.lock().unwrap().push(message.to_string());
    }
}

/// Stand-in for the process-exit primitive: records each code instead of
/// terminating.
#[derive(Clone, Default)]
pub struct MockExit {
    calls: Arc<Mutex<Vec<i32>>>,
}

impl MockExit {
    pub fn calls(&self) -> Vec<i32> {
        self.calls.lock().unwrap().clone()
    }

    pub fn as_fn(&self) -> impl Fn(i32) + Send + Sync + 'static {
        let calls = Arc::clone(&self.calls);
        move |code| calls.lock().unwrap().push(code)
    }
}
