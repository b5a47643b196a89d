//! Result and error types for Esperar.

use crate::output::Theme;
use crate::value::Value;
use thiserror::Error;

/// Result type for Esperar operations
pub type EsperarResult<T> = Result<T, EsperarError>;

/// Errors that can surface out of a test body
#[derive(Debug, Error)]
pub enum EsperarError {
    /// A matcher's expectation did not hold
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// Anything else that went wrong inside a test body or a matcher
    #[error("{message}")]
    Unexpected {
        /// Error message
        message: String,
    },
}

impl EsperarError {
    /// Create an unexpected (non-assertion) failure.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Check whether this is a structured assertion failure.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

/// The raw expected/actual pair carried by a failed assertion.
///
/// These are the values themselves, never preformatted strings; rendering
/// happens at report time.
#[derive(Debug, Clone)]
pub struct AssertionData {
    /// The value the matcher was asked for
    pub expected: Value,
    /// The subject (or derived value) the matcher observed
    pub actual: Value,
}

/// A structured assertion failure.
///
/// Raised by a matcher, caught by the runner, rendered as a two-line diff.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AssertionError {
    /// Human-readable description of the failed expectation
    pub message: String,
    /// Raw expected/actual pair for diagnostic rendering
    pub data: AssertionData,
}

impl AssertionError {
    /// Create an assertion failure.
    pub fn new(message: impl Into<String>, data: AssertionData) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    /// Render the expected/actual diff with colors, continuation lines
    /// indented by `indent` spaces.
    #[must_use]
    pub fn render_diff(&self, indent: usize) -> String {
        self.diff_with(indent, &Theme::color())
    }

    /// Render the diff through an explicit theme.
    #[must_use]
    pub fn diff_with(&self, indent: usize, theme: &Theme) -> String {
        let idn = " ".repeat(indent);
        format!(
            "{}\n{}{}",
            theme.expected_line(&self.data.expected.render_pretty()),
            idn,
            theme.actual_line(&self.data.actual.render_pretty())
        )
    }

    /// Render the diff block followed by the de-emphasized failure message.
    #[must_use]
    pub fn render_full(&self) -> String {
        self.full_with(&Theme::color())
    }

    /// Render the full report through an explicit theme.
    #[must_use]
    pub fn full_with(&self, theme: &Theme) -> String {
        format!("\n{}\n\n{}", self.diff_with(0, theme), theme.trace(&self.message))
    }
}

/// An error raised by an invoked callable subject.
#[derive(Debug, Clone, Error)]
#[error("{name}: {message}")]
pub struct Thrown {
    /// Runtime type name of the raised error (`"Error"`, `"TypeError"`, ...)
    pub name: String,
    /// Human-readable description
    pub message: String,
}

impl Thrown {
    /// Create a raised error with an explicit type name.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a plain `Error`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }

    /// Create a `TypeError`.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new("TypeError", message)
    }
}
