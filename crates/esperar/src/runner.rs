//! Test runner: executes bodies, times them, reports outcomes.
//!
//! The runner owns its output sink: hosts inject any `std::io::Write`
//! (stdout by default) instead of registering anything globally. A failing
//! body never escapes `test()`: assertion failures render as diffs,
//! anything else (including panics) renders as a de-emphasized trace, and
//! subsequent `test()` calls always run.

use crate::output::Theme;
use crate::result::{EsperarError, EsperarResult};
use std::any::Any;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Executes test bodies sequentially and reports one line (or block) per
/// call to its sink.
///
/// Holds no cross-call state: each `test()` owns its own timing and error
/// scope, so one failure cannot corrupt or skip another.
pub struct Runner<W: Write> {
    out: W,
    theme: Theme,
}

impl Runner<io::Stdout> {
    /// Runner reporting to standard output with colors.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Runner<W> {
    /// Runner reporting to an injected sink, colored by default.
    pub fn new(out: W) -> Self {
        Self {
            out,
            theme: Theme::color(),
        }
    }

    /// Toggle color escape codes in report output.
    #[must_use]
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.theme = Theme::new(use_color);
        self
    }

    /// Consume the runner and recover its sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Execute `body`, time it, and report the outcome.
    ///
    /// Never re-raises: assertion failures are rendered as diffs, any other
    /// error (or a panic in the body) as its trace text.
    pub fn test<F>(&mut self, description: &str, body: F)
    where
        F: FnOnce() -> EsperarResult<()>,
    {
        tracing::debug!(description, "test started");
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(body));
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(Ok(())) => {
                tracing::debug!(description, elapsed_ms, "test passed");
                let _ = writeln!(self.out, "\n{}", self.theme.pass_line(description, elapsed_ms));
            }
            Ok(Err(error)) => self.report_failure(description, elapsed_ms, &error),
            Err(payload) => {
                let error = EsperarError::unexpected(panic_message(&payload));
                self.report_failure(description, elapsed_ms, &error);
            }
        }
    }

    /// Alias of [`Runner::test`].
    pub fn it<F>(&mut self, description: &str, body: F)
    where
        F: FnOnce() -> EsperarResult<()>,
    {
        self.test(description, body);
    }

    fn report_failure(&mut self, description: &str, elapsed_ms: f64, error: &EsperarError) {
        tracing::debug!(description, elapsed_ms, %error, "test failed");
        let _ = writeln!(self.out, "\n{}", self.theme.fail_line(description, elapsed_ms));
        match error {
            EsperarError::Assertion(assertion) => {
                let _ = writeln!(self.out, "{}", assertion.full_with(&self.theme));
            }
            EsperarError::Unexpected { message } => {
                let _ = writeln!(self.out, "{}", self.theme.trace(message));
            }
        }
    }
}

impl<W: Write> std::fmt::Debug for Runner<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner").field("theme", &self.theme).finish()
    }
}

/// Execute a test body, reporting to standard output.
pub fn test<F>(description: &str, body: F)
where
    F: FnOnce() -> EsperarResult<()>,
{
    Runner::stdout().test(description, body);
}

/// Alias of [`test`].
pub fn it<F>(description: &str, body: F)
where
    F: FnOnce() -> EsperarResult<()>,
{
    test(description, body);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "test body panicked".to_string()
    }
}
