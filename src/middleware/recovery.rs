use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

use crate::context::{Context, Handler};

/// Panic recovery middleware
///
/// Runs the rest of the chain under `catch_unwind`. A panic in any
/// downstream handler is logged with its message and a backtrace, and the
/// request is answered with `500 {"message": "Internal Server Error"}`.
/// Other requests are unaffected.
///
/// The logged backtrace is captured after the unwind has finished, so it
/// shows where the panic was caught, not where it was raised. The default
/// panic hook still prints the raising location (with a trace when
/// `RUST_BACKTRACE` is set).
///
/// Register it early (outermost) so it covers everything after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recovery;

impl Handler for Recovery {
    fn handle(&self, ctx: &mut Context) {
        let outcome = catch_unwind(AssertUnwindSafe(|| ctx.next()));
        if let Err(panic) = outcome {
            let panic_message = panic_message(panic.as_ref());
            let backtrace = Backtrace::capture();

            error!(
                request_id = %ctx.request_id(),
                method = %ctx.method(),
                path = %ctx.path(),
                panic_message = %panic_message,
                backtrace = %backtrace,
                "Handler panicked"
            );

            ctx.fail(500, "Internal Server Error");
        }
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
