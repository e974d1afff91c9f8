//! Graceful OS-signal handling for long-running processes.
//!
//! This crate lets independent subsystems register reactions to OS signals
//! and coordinates an orderly shutdown when a termination signal arrives.
//! Cleanup actions run in registration order, a failing action never stops
//! the ones after it, and the first failure decides the process exit code.
//!
//! ```no_run
//! use graceful_signal::signal::SIGHUP;
//! use graceful_signal::{wrap_error_with_code, Handlers};
//!
//! # fn flush_buffers() -> Result<(), graceful_signal::BoxError> { Ok(()) }
//! let handlers = Handlers::default();
//! handlers.register_signal_handler(|sig| println!("reloading on signal {sig}"), &[SIGHUP]);
//! handlers.register_termination_procedure(
//!     |_sig| wrap_error_with_code(flush_buffers(), 3),
//!     "flushing buffers",
//! );
//! let listener = handlers.start_listen().expect("subscribe to signals");
//! // ... run the application ...
//! listener.cancel();
//! ```

#![deny(clippy::all)]

mod error;
mod exit_code;
mod handlers;
mod listener;
mod logger;
mod procedure;
mod registry;
#[cfg(test)]
mod test_support;

pub use error::SignalError;
pub use exit_code::code_from_error;
pub use exit_code::wrap_error_with_code;
pub use exit_code::BoxError;
pub use exit_code::ExitCodeError;
pub use handlers::Handlers;
pub use handlers::DEFAULT_TERMINATION_SIGNALS;
pub use listener::ListenerHandle;
pub use logger::Logger;
pub use logger::StdLogger;
pub use procedure::termination_func;
pub use procedure::TerminationResult;

pub use signal_hook::consts::signal;

/// OS signal number, as delivered by the kernel.
pub type Signal = std::os::raw::c_int;
