//! Esperar: chainable expect assertions with a minimal sequential runner
//!
//! Esperar (Spanish: "to expect") pairs a [`test`]/[`it`] runner with a
//! chainable [`expect`] matcher DSL over dynamically typed subject values.
//! Each matcher either passes or fails with a structured
//! [`AssertionError`] carrying the raw expected/actual pair; the runner
//! catches every failure, renders a colored diff (or a de-emphasized trace
//! for anything that is not an assertion), and always keeps going.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  expect()    │────►│  Assertion   │────►│  Runner      │
//! │  (factory)   │     │  + matchers  │     │  test()/it() │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        subjects are Value; failures are EsperarError
//! ```
//!
//! # Example
//!
//! ```
//! use esperar::prelude::*;
//!
//! let mut runner = Runner::stdout();
//! runner.test("adds two numbers", || expect(1 + 2).to_be(3));
//! runner.it("negation chains", || expect([1, 2, 3]).not().to_contain(5));
//! ```

#![warn(missing_docs)]

mod assertion;
mod output;
mod result;
mod runner;
mod value;

pub use assertion::{expect, Assertion};
pub use output::Theme;
pub use result::{AssertionData, AssertionError, EsperarError, EsperarResult, Thrown};
pub use runner::{it, test, Runner};
pub use value::{Callable, Kind, Value};

/// Common imports for test suites.
pub mod prelude {
    pub use crate::assertion::{expect, Assertion};
    pub use crate::result::{EsperarError, EsperarResult, Thrown};
    pub use crate::runner::{it, test, Runner};
    pub use crate::value::{Kind, Value};
}
