//! Signal registry: ordered callbacks keyed by signal or the wildcard.

use std::collections::HashMap;
use std::sync::Arc;

use crate::Signal;

/// Registry key. The wildcard is its own variant, so it can never collide
/// with a real signal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SignalKey {
    Wildcard,
    Specific(Signal),
}

pub(crate) type HandlerFunc = Arc<dyn Fn(Signal) + Send + Sync>;

/// One dispatch target. `Termination` is the marker installed at
/// construction under each termination signal; dispatch expands it into
/// the termination pipeline.
pub(crate) enum RegisteredHandler {
    Callback(HandlerFunc),
    Termination,
}

/// Mapping from key to callbacks in registration order. Lists only grow;
/// there is no unregister. Locking is the caller's concern: the facade
/// guards this together with the procedure list under one rwlock.
pub(crate) struct SignalRegistry {
    entries: HashMap<SignalKey, Vec<RegisteredHandler>>,
}

impl SignalRegistry {
    pub(crate) fn new() -> Self {
        let mut entries = HashMap::new();
        // The wildcard entry always exists, even with zero callbacks.
        entries.insert(SignalKey::Wildcard, Vec::new());
        Self { entries }
    }

    /// Appends `handler` to the wildcard list (empty `signals`) or to each
    /// named signal's list, creating lists on demand.
    pub(crate) fn register(&mut self, handler: HandlerFunc, signals: &[Signal]) {
        if signals.is_empty() {
            self.push(SignalKey::Wildcard, RegisteredHandler::Callback(handler));
            return;
        }
        for &sig in signals {
            self.push(
                SignalKey::Specific(sig),
                RegisteredHandler::Callback(Arc::clone(&handler)),
            );
        }
    }

    /// Installs the internal termination marker for `sig`. Called once per
    /// termination signal at construction, before any user registration.
    pub(crate) fn install_termination_marker(&mut self, sig: Signal) {
        self.push(SignalKey::Specific(sig), RegisteredHandler::Termination);
    }

    pub(crate) fn wildcard(&self) -> &[RegisteredHandler] {
        self.entries
            .get(&SignalKey::Wildcard)
            .map_or(&[], Vec::as_slice)
    }

    pub(crate) fn specific(&self, sig: Signal) -> Option<&[RegisteredHandler]> {
        self.entries
            .get(&SignalKey::Specific(sig))
            .map(Vec::as_slice)
    }

    fn push(&mut self, key: SignalKey, handler: RegisteredHandler) {
        self.entries.entry(key).or_default().push(handler);
    }
}
