//! Termination procedures: ordered cleanup actions run during shutdown.

use crate::exit_code::code_from_error;
use crate::exit_code::BoxError;
use crate::logger::log_info;
use crate::logger::Logger;
use crate::Signal;

/// Outcome of a termination procedure.
///
/// An `Err` is logged and folded into the process exit code: the first
/// failing procedure (in registration order) decides it. Use
/// [`wrap_error_with_code`](crate::wrap_error_with_code) to pin a specific
/// code, otherwise 1 is used.
pub type TerminationResult = Result<(), BoxError>;

pub(crate) type TerminationFunc = Box<dyn Fn(Signal) -> TerminationResult + Send + Sync>;

/// Adapts a no-argument cleanup action that cannot fail into a
/// termination callback.
pub fn termination_func<F>(f: F) -> impl Fn(Signal) -> TerminationResult + Send + Sync
where
    F: Fn() + Send + Sync,
{
    move |_sig| {
        f();
        Ok(())
    }
}

pub(crate) struct TerminationProcedure {
    pub(crate) func: TerminationFunc,
    pub(crate) message: String,
}

/// Runs every procedure in registration order and resolves the aggregate
/// exit code. A failing procedure never stops the ones after it; errors
/// past the first can no longer change the code.
pub(crate) fn run_procedures(
    procedures: &[TerminationProcedure],
    log: Option<&dyn Logger>,
    sig: Signal,
) -> i32 {
    if procedures.is_empty() {
        log_info(log, "nothing to do before termination");
        return 0;
    }

    let mut code = 0;
    for procedure in procedures {
        log_info(log, &procedure.message);
        if let Err(err) = (procedure.func)(sig) {
            log_info(
                log,
                &format!("error while running termination procedure: {err}"),
            );
            if code == 0 {
                code = code_from_error(&*err, 1);
            }
        }
    }
    log_info(log, "all termination procedures are done");
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_code::wrap_error_with_code;
    use crate::test_support::RecordingLogger;
    use signal_hook::consts::signal::SIGTERM;
    use std::io;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn failing(message: &'static str) -> TerminationFunc {
        Box::new(move |_| Err(Box::new(io::Error::new(io::ErrorKind::Other, message)) as BoxError))
    }

    fn procedure(func: TerminationFunc, message: &str) -> TerminationProcedure {
        TerminationProcedure {
            func,
            message: message.to_string(),
        }
    }

    #[test]
    fn empty_pipeline_resolves_to_zero() {
        let logger = RecordingLogger::default();
        let code = run_procedures(&[], Some(&logger), SIGTERM);
        assert_eq!(code, 0);
        assert_eq!(logger.infos(), vec!["nothing to do before termination"]);
    }

    #[test]
    fn successful_pipeline_resolves_to_zero() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let procedures = vec![procedure(
            Box::new(termination_func(move || {
                counted.fetch_add(1, Ordering::SeqCst);
            })),
            "closing connections",
        )];
        let code = run_procedures(&procedures, None, SIGTERM);
        assert_eq!(code, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn first_error_wins_but_later_procedures_still_run() {
        let second_ran = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&second_ran);
        let procedures = vec![
            procedure(
                Box::new(|_| {
                    wrap_error_with_code(
                        Err(Box::new(io::Error::new(io::ErrorKind::Other, "coded")) as BoxError),
                        42,
                    )
                }),
                "first",
            ),
            procedure(
                Box::new(move |_| {
                    observed.fetch_add(1, Ordering::SeqCst);
                    Err(Box::new(io::Error::new(io::ErrorKind::Other, "plain")) as BoxError)
                }),
                "second",
            ),
        ];
        let code = run_procedures(&procedures, None, SIGTERM);
        assert_eq!(code, 42);
        assert_eq!(second_ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unwrapped_error_defaults_to_one() {
        let procedures = vec![procedure(failing("boom"), "cleanup")];
        assert_eq!(run_procedures(&procedures, None, SIGTERM), 1);
    }

    #[test]
    fn messages_are_logged_in_order() {
        let logger = RecordingLogger::default();
        let procedures = vec![
            procedure(Box::new(termination_func(|| {})), "flushing"),
            procedure(failing("boom"), "unmounting"),
        ];
        run_procedures(&procedures, Some(&logger), SIGTERM);
        assert_eq!(
            logger.infos(),
            vec![
                "flushing",
                "unmounting",
                "error while running termination procedure: boom",
                "all termination procedures are done",
            ]
        );
    }

    #[test]
    fn procedure_receives_the_triggering_signal() {
        let seen = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&seen);
        let procedures = vec![procedure(
            Box::new(move |sig| {
                observed.store(sig as usize, Ordering::SeqCst);
                Ok(())
            }),
            "recording the signal",
        )];
        run_procedures(&procedures, None, SIGTERM);
        assert_eq!(seen.load(Ordering::SeqCst), SIGTERM as usize);
    }
}
