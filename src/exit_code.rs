//! Exit-code carrier: pins an explicit process exit code to a failure.

use std::error::Error;

/// Boxed error type returned by termination procedures.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// An error carrying the exit code the process should terminate with.
///
/// Produced by [`wrap_error_with_code`]; recovered by [`code_from_error`]
/// when the termination pipeline resolves the aggregate exit code.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct ExitCodeError {
    source: BoxError,
    code: i32,
}

impl ExitCodeError {
    /// The exit code pinned to this failure.
    pub fn code(&self) -> i32 {
        self.code
    }
}

/// Wraps the failure in `result` with an explicit exit code.
///
/// `Ok` passes through untouched, so this can be applied unconditionally
/// to the outcome of a termination procedure.
pub fn wrap_error_with_code(result: Result<(), BoxError>, code: i32) -> Result<(), BoxError> {
    result.map_err(|source| Box::new(ExitCodeError { source, code }) as BoxError)
}

/// Recovers the exit code pinned to `err`, or `default` if the error does
/// not carry one.
pub fn code_from_error(err: &(dyn Error + 'static), default: i32) -> i32 {
    err.downcast_ref::<ExitCodeError>()
        .map_or(default, ExitCodeError::code)
}
