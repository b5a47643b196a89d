//! Chainable assertions over dynamic subject values.
//!
//! [`expect`] wraps a subject in an [`Assertion`]; each matcher method checks
//! one named condition and fails with a structured [`AssertionError`]
//! carrying the raw expected/actual pair. Polarity is flipped with
//! [`Assertion::not`], which every matcher honors through the single
//! `evaluate` gate.

use crate::result::{AssertionData, AssertionError, EsperarError, EsperarResult};
use crate::value::{Kind, Value};
use regex::Regex;
use std::cmp::Ordering;

/// Create an assertion over a subject.
///
/// # Example
///
/// ```
/// use esperar::expect;
///
/// assert!(expect(1 + 2).to_be(3).is_ok());
/// assert!(expect(1 + 2).not().to_be(4).is_ok());
/// ```
pub fn expect(subject: impl Into<Value>) -> Assertion {
    Assertion::new(subject)
}

/// A chainable wrapper around a subject value.
///
/// Immutable once constructed: [`Assertion::not`] returns a new assertion
/// over the same subject with inverted polarity, and any number of matcher
/// calls may be made against one assertion, each re-evaluating the subject
/// independently.
#[derive(Debug, Clone)]
pub struct Assertion {
    subject: Value,
    invert: bool,
}

impl Assertion {
    /// Create an assertion with default (non-inverted) polarity.
    #[must_use]
    pub fn new(subject: impl Into<Value>) -> Self {
        Self {
            subject: subject.into(),
            invert: false,
        }
    }

    /// A new assertion over the same subject with flipped polarity.
    ///
    /// Double negation restores the original polarity.
    #[must_use]
    pub fn not(&self) -> Self {
        Self {
            subject: self.subject.clone(),
            invert: !self.invert,
        }
    }

    /// The value under test.
    #[must_use]
    pub const fn subject(&self) -> &Value {
        &self.subject
    }

    /// The shared gate every matcher funnels through: fails when `condition`
    /// is false, or, with inverted polarity, when it is true.
    fn evaluate(
        &self,
        condition: bool,
        message: String,
        data: AssertionData,
    ) -> EsperarResult<()> {
        let should_fail = if self.invert { condition } else { !condition };
        if should_fail {
            return Err(AssertionError::new(message, data).into());
        }
        Ok(())
    }

    fn data_against(&self, expected: Value) -> AssertionData {
        AssertionData {
            expected,
            actual: self.subject.clone(),
        }
    }

    /// Subject is strictly identical to `expected`.
    pub fn to_be(&self, expected: impl Into<Value>) -> EsperarResult<()> {
        let expected = expected.into();
        self.evaluate(
            self.subject.strict_eq(&expected),
            format!("Expected {} to be {}", self.subject, expected),
            self.data_against(expected),
        )
    }

    /// Subject is loosely (coercively) equal to `expected`.
    pub fn to_equal(&self, expected: impl Into<Value>) -> EsperarResult<()> {
        let expected = expected.into();
        self.evaluate(
            self.subject.loose_eq(&expected),
            format!("Expected {} to equal {}", self.subject, expected),
            self.data_against(expected),
        )
    }

    /// Subject is strictly identical to `expected`, no coercion.
    pub fn to_strict_equal(&self, expected: impl Into<Value>) -> EsperarResult<()> {
        let expected = expected.into();
        self.evaluate(
            self.subject.strict_eq(&expected),
            format!("Expected {} to strictly equal {}", self.subject, expected),
            self.data_against(expected),
        )
    }

    /// Subject is truthy.
    pub fn to_be_truthy(&self) -> EsperarResult<()> {
        self.evaluate(
            self.subject.is_truthy(),
            format!("Expected {} to be truthy", self.subject),
            self.data_against(Value::Bool(true)),
        )
    }

    /// Subject is falsy.
    pub fn to_be_falsy(&self) -> EsperarResult<()> {
        self.evaluate(
            !self.subject.is_truthy(),
            format!("Expected {} to be falsy", self.subject),
            self.data_against(Value::Bool(false)),
        )
    }

    /// Subject is exactly null (distinct from undefined).
    pub fn to_be_null(&self) -> EsperarResult<()> {
        self.evaluate(
            matches!(self.subject, Value::Null),
            format!("Expected {} to be null", self.subject),
            self.data_against(Value::Null),
        )
    }

    /// Subject is the not-a-number value.
    pub fn to_be_nan(&self) -> EsperarResult<()> {
        self.evaluate(
            matches!(self.subject, Value::Number(n) if n.is_nan()),
            format!("Expected {} to be NaN", self.subject),
            self.data_against(Value::Number(f64::NAN)),
        )
    }

    /// Subject is not undefined.
    pub fn to_be_defined(&self) -> EsperarResult<()> {
        self.evaluate(
            !matches!(self.subject, Value::Undefined),
            format!("Expected {} to be defined", self.subject),
            self.data_against(Value::Text("defined value".to_string())),
        )
    }

    /// Subject is exactly undefined (distinct from null).
    pub fn to_be_undefined(&self) -> EsperarResult<()> {
        self.evaluate(
            matches!(self.subject, Value::Undefined),
            format!("Expected {} to be undefined", self.subject),
            self.data_against(Value::Undefined),
        )
    }

    /// Subject's runtime type is `expected`.
    pub fn to_be_instance_of(&self, expected: Kind) -> EsperarResult<()> {
        self.evaluate(
            self.subject.kind() == expected,
            format!("Expected {} to be an instance of {expected}", self.subject),
            self.data_against(Value::Text(expected.to_string())),
        )
    }

    /// Subject (text) matches `pattern`.
    pub fn to_match(&self, pattern: &Regex) -> EsperarResult<()> {
        let Value::Text(text) = &self.subject else {
            return Err(EsperarError::unexpected(format!(
                "{} does not support pattern matching",
                self.subject
            )));
        };
        self.evaluate(
            pattern.is_match(text),
            format!("Expected {} to match {pattern}", self.subject),
            self.data_against(Value::Text(pattern.to_string())),
        )
    }

    /// Invoking the subject raises any error.
    ///
    /// The error is captured and discarded, never re-raised. Invoking a
    /// non-callable raises, so a non-callable subject counts as throwing.
    pub fn to_throw(&self) -> EsperarResult<()> {
        let raised = self.subject.invoke().err();
        let condition = raised.is_some();
        self.evaluate(
            condition,
            "Expected function to throw an error".to_string(),
            AssertionData {
                expected: Value::Text("Error".to_string()),
                actual: raised.map_or(Value::Null, |e| Value::Text(e.to_string())),
            },
        )
    }

    /// Invoking the subject raises an error whose type name is `expected`.
    pub fn to_throw_error(&self, expected: &str) -> EsperarResult<()> {
        let raised = self.subject.invoke().err();
        let condition = raised.as_ref().is_some_and(|e| e.name == expected);
        self.evaluate(
            condition,
            format!("Expected function to throw an instance of {expected}"),
            AssertionData {
                expected: Value::Text(expected.to_string()),
                actual: raised.map_or(Value::Null, |e| Value::Text(e.to_string())),
            },
        )
    }

    /// Subject's property `key` is truthy.
    ///
    /// Known limitation, kept for compatibility: this tests truthiness of the
    /// property value rather than its presence, so a present-but-falsy
    /// property (`0`, `""`, `false`) is reported as missing.
    pub fn to_have_property(&self, key: &str) -> EsperarResult<()> {
        if matches!(self.subject, Value::Undefined | Value::Null) {
            return Err(EsperarError::unexpected(format!(
                "cannot read property {key} of {}",
                self.subject
            )));
        }
        self.evaluate(
            self.subject.get(key).is_truthy(),
            format!("Expected object to have property {key}"),
            self.data_against(Value::Text(key.to_string())),
        )
    }

    /// Alias of [`Assertion::to_have_property`].
    pub fn to_have_property_of(&self, key: &str) -> EsperarResult<()> {
        self.to_have_property(key)
    }

    /// Subject's length equals `expected`.
    ///
    /// A subject without a length never equals `expected` (and with inverted
    /// polarity always passes); it is not an error.
    pub fn to_have_length(&self, expected: usize) -> EsperarResult<()> {
        let actual = self
            .subject
            .length()
            .map_or(Value::Undefined, |len| Value::Number(len as f64));
        self.evaluate(
            actual.strict_eq(&Value::Number(expected as f64)),
            format!("Expected array to have length of {expected}"),
            AssertionData {
                expected: Value::Number(expected as f64),
                actual,
            },
        )
    }

    /// Alias of [`Assertion::to_have_length`].
    pub fn to_have_length_of(&self, expected: usize) -> EsperarResult<()> {
        self.to_have_length(expected)
    }

    fn membership(&self, needle: &Value) -> EsperarResult<bool> {
        match &self.subject {
            Value::List(items) => Ok(items.iter().any(|item| item.same_value_zero(needle))),
            Value::Text(text) => Ok(text.contains(&needle.to_string())),
            other => Err(EsperarError::unexpected(format!(
                "{other} does not support membership checks"
            ))),
        }
    }

    /// Subject (list) contains the element `expected`; for text subjects this
    /// is a substring check.
    pub fn to_contain(&self, expected: impl Into<Value>) -> EsperarResult<()> {
        let expected = expected.into();
        let condition = self.membership(&expected)?;
        self.evaluate(
            condition,
            format!("Expected array to contain {expected}"),
            self.data_against(expected),
        )
    }

    /// Alias of [`Assertion::to_contain`]; membership is the same identity
    /// check, not deep equality.
    pub fn to_contain_equal(&self, expected: impl Into<Value>) -> EsperarResult<()> {
        self.to_contain(expected)
    }

    /// Key `key` is present in the subject (map keys, list indices).
    pub fn to_contain_key(&self, key: &str) -> EsperarResult<()> {
        let condition = match &self.subject {
            Value::Map(entries) => entries.contains_key(key),
            Value::List(items) => key.parse::<usize>().is_ok_and(|index| index < items.len()),
            other => {
                return Err(EsperarError::unexpected(format!(
                    "cannot use key lookups on {other}"
                )));
            }
        };
        self.evaluate(
            condition,
            format!("Expected object to contain key {key}"),
            self.data_against(Value::Text(key.to_string())),
        )
    }

    /// `expected` is present among the subject's values.
    pub fn to_contain_value(&self, expected: impl Into<Value>) -> EsperarResult<()> {
        let expected = expected.into();
        let condition = match &self.subject {
            Value::Undefined | Value::Null => {
                return Err(EsperarError::unexpected(format!(
                    "cannot enumerate values of {}",
                    self.subject
                )));
            }
            Value::Map(entries) => entries.values().any(|v| v.same_value_zero(&expected)),
            Value::List(items) => items.iter().any(|v| v.same_value_zero(&expected)),
            Value::Text(text) => text
                .chars()
                .any(|c| Value::Text(c.to_string()).same_value_zero(&expected)),
            _ => false,
        };
        self.evaluate(
            condition,
            format!("Expected object to contain value {expected}"),
            self.data_against(expected),
        )
    }

    /// Subject's entry at `key` strictly equals the paired value.
    pub fn to_contain_entry<V: Into<Value>>(&self, entry: (&str, V)) -> EsperarResult<()> {
        self.entry_check(entry, false)
    }

    /// Subject's entry at `key` loosely equals the paired value.
    pub fn to_contain_equal_entry<V: Into<Value>>(&self, entry: (&str, V)) -> EsperarResult<()> {
        self.entry_check(entry, true)
    }

    fn entry_check<V: Into<Value>>(&self, entry: (&str, V), loose: bool) -> EsperarResult<()> {
        let (key, value) = entry;
        let value = value.into();
        if matches!(self.subject, Value::Undefined | Value::Null) {
            return Err(EsperarError::unexpected(format!(
                "cannot read property {key} of {}",
                self.subject
            )));
        }
        let observed = self.subject.get(key);
        let condition = if loose {
            observed.loose_eq(&value)
        } else {
            observed.strict_eq(&value)
        };
        self.evaluate(
            condition,
            format!("Expected object to contain entry {key},{value}"),
            self.data_against(Value::List(vec![Value::Text(key.to_string()), value])),
        )
    }

    /// Subject orders strictly greater than `expected`.
    pub fn to_be_greater_than(&self, expected: impl Into<Value>) -> EsperarResult<()> {
        let expected = expected.into();
        self.evaluate(
            matches!(self.subject.compare(&expected), Some(Ordering::Greater)),
            format!("Expected {} to be greater than {}", self.subject, expected),
            self.data_against(expected),
        )
    }

    /// Subject orders greater than or equal to `expected`.
    pub fn to_be_greater_than_or_equal(&self, expected: impl Into<Value>) -> EsperarResult<()> {
        let expected = expected.into();
        self.evaluate(
            matches!(
                self.subject.compare(&expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            format!(
                "Expected {} to be greater than or equal to {}",
                self.subject, expected
            ),
            self.data_against(expected),
        )
    }

    /// Subject orders strictly less than `expected`.
    pub fn to_be_less_than(&self, expected: impl Into<Value>) -> EsperarResult<()> {
        let expected = expected.into();
        self.evaluate(
            matches!(self.subject.compare(&expected), Some(Ordering::Less)),
            format!("Expected {} to be less than {}", self.subject, expected),
            self.data_against(expected),
        )
    }

    /// Subject orders less than or equal to `expected`.
    pub fn to_be_less_than_or_equal(&self, expected: impl Into<Value>) -> EsperarResult<()> {
        let expected = expected.into();
        self.evaluate(
            matches!(
                self.subject.compare(&expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            format!(
                "Expected {} to be less than or equal to {}",
                self.subject, expected
            ),
            self.data_against(expected),
        )
    }

    /// Absolute difference between subject and `expected` is at most `delta`
    /// (inclusive).
    pub fn to_be_close_to(&self, expected: f64, delta: f64) -> EsperarResult<()> {
        let difference = (self.subject.as_number() - expected).abs();
        self.evaluate(
            difference <= delta,
            format!("Expected {} to be close to {expected}", self.subject),
            self.data_against(Value::Number(expected)),
        )
    }
}
