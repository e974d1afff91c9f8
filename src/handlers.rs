//! The handlers facade: one registry, one termination pipeline, one
//! logger, one exit function, all behind a single reader-writer lock.

use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::thread;

use signal_hook::consts::signal::SIGINT;
use signal_hook::consts::signal::SIGTERM;
use signal_hook::iterator::Signals;
use tracing::warn;

use crate::error::SignalError;
use crate::listener::catchable_signals;
use crate::listener::ListenerHandle;
use crate::logger::log_debug;
use crate::logger::log_info;
use crate::logger::Logger;
use crate::logger::StdLogger;
use crate::procedure::run_procedures;
use crate::procedure::TerminationProcedure;
use crate::procedure::TerminationResult;
use crate::registry::RegisteredHandler;
use crate::registry::SignalRegistry;
use crate::Signal;

/// Termination signals used when the caller does not name their own.
pub const DEFAULT_TERMINATION_SIGNALS: [Signal; 2] = [SIGTERM, SIGINT];

type ExitFn = Box<dyn Fn(i32) + Send + Sync>;

fn default_exit(code: i32) {
    std::process::exit(code)
}

/// Everything mutable, guarded by the one rwlock: registration takes the
/// write side, dispatch and the termination pipeline the read side.
struct State {
    registry: SignalRegistry,
    procedures: Vec<TerminationProcedure>,
    log: Option<Box<dyn Logger>>,
    exit: ExitFn,
}

struct Inner {
    termination_signals: Vec<Signal>,
    state: RwLock<State>,
}

impl Inner {
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!("recovering from poisoned signal-handler lock (read)");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!("recovering from poisoned signal-handler lock (write)");
            poisoned.into_inner()
        })
    }

    /// Runs wildcard callbacks first, then the callbacks registered for
    /// `target`, each set in registration order. Holds the read guard for
    /// the whole chain, so no registration can interleave.
    fn dispatch(&self, target: Signal) {
        let state = self.read();
        for handler in state.registry.wildcard() {
            self.invoke(&state, handler, target);
        }
        match state.registry.specific(target) {
            Some(handlers) => {
                for handler in handlers {
                    self.invoke(&state, handler, target);
                }
            }
            None => log_debug(
                state.log.as_deref(),
                &format!("no handler registered for signal: {target}"),
            ),
        }
    }

    fn invoke(&self, state: &State, handler: &RegisteredHandler, target: Signal) {
        match handler {
            RegisteredHandler::Callback(callback) => callback(target),
            RegisteredHandler::Termination => self.terminate(state, target),
        }
    }

    /// Termination pipeline, farewell line, then the exit function. Runs
    /// under the dispatch read guard already held by the caller.
    fn terminate(&self, state: &State, sig: Signal) {
        let code = run_procedures(&state.procedures, state.log.as_deref(), sig);
        log_info(state.log.as_deref(), "bye");
        (state.exit)(code);
    }
}

/// Facade over the signal registry and the termination pipeline.
///
/// Cheap to clone; clones share the same registry, procedures, logger and
/// exit function.
#[derive(Clone)]
pub struct Handlers {
    inner: Arc<Inner>,
}

impl Default for Handlers {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Handlers {
    /// Creates the facade with the given termination signals, or
    /// [`DEFAULT_TERMINATION_SIGNALS`] when `termination_signals` is
    /// empty. Construction installs the internal termination handler
    /// under each of those signals; the set is fixed afterwards.
    pub fn new(termination_signals: &[Signal]) -> Self {
        let termination_signals = if termination_signals.is_empty() {
            DEFAULT_TERMINATION_SIGNALS.to_vec()
        } else {
            termination_signals.to_vec()
        };

        let mut registry = SignalRegistry::new();
        for &sig in &termination_signals {
            registry.install_termination_marker(sig);
        }

        Self {
            inner: Arc::new(Inner {
                termination_signals,
                state: RwLock::new(State {
                    registry,
                    procedures: Vec::new(),
                    log: Some(Box::new(StdLogger)),
                    exit: Box::new(default_exit),
                }),
            }),
        }
    }

    /// The signals that trigger the termination pipeline.
    pub fn termination_signals(&self) -> &[Signal] {
        &self.inner.termination_signals
    }

    /// Registers `handler` for all signals (empty `signals`) or for each
    /// named signal.
    ///
    /// Handlers for one signal run in registration order; handlers
    /// registered for all signals run before signal-specific ones.
    pub fn register_signal_handler<F>(&self, handler: F, signals: &[Signal])
    where
        F: Fn(Signal) + Send + Sync + 'static,
    {
        let mut state = self.inner.write();
        state.registry.register(Arc::new(handler), signals);
    }

    /// Registers `func` to run when a termination signal arrives.
    /// `message` is logged right before the procedure runs.
    pub fn register_termination_procedure<F>(&self, func: F, message: impl Into<String>)
    where
        F: Fn(Signal) -> TerminationResult + Send + Sync + 'static,
    {
        let message = message.into();
        let mut state = self.inner.write();
        log_debug(
            state.log.as_deref(),
            &format!("registered termination procedure for: {message}"),
        );
        state.procedures.push(TerminationProcedure {
            func: Box::new(func),
            message,
        });
    }

    /// Replaces the logger. `None` disables logging entirely.
    pub fn set_logger(&self, logger: Option<Box<dyn Logger>>) {
        self.inner.write().log = logger;
    }

    /// Replaces the exit function invoked after the termination pipeline.
    /// Defaults to [`std::process::exit`]; substitute it in tests.
    pub fn set_exit_fn<F>(&self, exit: F)
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.inner.write().exit = Box::new(exit);
    }

    /// Subscribes to every catchable signal and spawns the background
    /// dispatch thread. Termination signals need not be listening-specific:
    /// the subscription always covers all of them.
    ///
    /// Each call creates an independent subscription with its own
    /// cancellation handle.
    pub fn start_listen(&self) -> Result<ListenerHandle, SignalError> {
        log_debug(
            self.inner.read().log.as_deref(),
            "start listening to all signals",
        );
        let mut signals = Signals::new(catchable_signals()).map_err(SignalError::Subscribe)?;
        let handle = signals.handle();
        let inner = Arc::clone(&self.inner);
        let thread = thread::Builder::new()
            .name("signal-dispatch".to_string())
            .spawn(move || {
                for sig in signals.forever() {
                    log_info(
                        inner.read().log.as_deref(),
                        &format!("signal received: {sig}"),
                    );
                    inner.dispatch(sig);
                }
            })
            .map_err(SignalError::SpawnThread)?;
        Ok(ListenerHandle::new(handle, thread))
    }

    /// Feeds one signal through the registry, exactly as the listener
    /// thread does for delivered signals.
    #[cfg(test)]
    fn dispatch(&self, sig: Signal) {
        self.inner.dispatch(sig);
    }
}
