//! Dynamic subject values for the matcher DSL.
//!
//! Subjects under test are dynamically typed: a [`Value`] can hold nothing at
//! all (`Undefined`), an explicit `Null`, scalars, text, lists, string-keyed
//! maps, or a zero-argument callable. The matcher set relies on the coercion
//! rules defined here (truthiness, strict vs loose equality, ToNumber and
//! ToString conversions), so they live next to the data model rather than in
//! the matchers themselves.

use crate::result::Thrown;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

/// Runtime type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    /// No value at all
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Bool,
    /// Floating-point number (also carries NaN)
    Number,
    /// Text
    Text,
    /// Ordered list of values
    List,
    /// String-keyed map of values
    Map,
    /// Zero-argument callable
    Func,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::Text => "string",
            Self::List => "list",
            Self::Map => "map",
            Self::Func => "function",
        };
        f.write_str(name)
    }
}

/// A zero-argument callable subject.
///
/// Invoking it either completes normally or raises a [`Thrown`] error; the
/// return value is discarded by every matcher that invokes one.
#[derive(Clone)]
pub struct Callable(Rc<dyn Fn() -> Result<(), Thrown>>);

impl Callable {
    /// Wrap a closure as a callable subject.
    pub fn new(f: impl Fn() -> Result<(), Thrown> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callable.
    ///
    /// # Errors
    ///
    /// Returns whatever the wrapped closure raised.
    pub fn call(&self) -> Result<(), Thrown> {
        (self.0)()
    }

    fn identity_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable")
    }
}

/// A dynamically typed subject value.
#[derive(Debug, Clone)]
pub enum Value {
    /// No value at all; distinct from `Null`
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Floating-point number
    Number(f64),
    /// Text
    Text(String),
    /// Ordered list of values
    List(Vec<Value>),
    /// String-keyed map of values
    Map(BTreeMap<String, Value>),
    /// Zero-argument callable
    Func(Callable),
}

impl Value {
    /// Wrap a closure as a callable subject value.
    pub fn func(f: impl Fn() -> Result<(), Thrown> + 'static) -> Self {
        Self::Func(Callable::new(f))
    }

    /// Runtime type tag.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Undefined => Kind::Undefined,
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Bool,
            Self::Number(_) => Kind::Number,
            Self::Text(_) => Kind::Text,
            Self::List(_) => Kind::List,
            Self::Map(_) => Kind::Map,
            Self::Func(_) => Kind::Func,
        }
    }

    /// Truthiness: `Undefined`, `Null`, `false`, `0`, NaN and `""` are falsy;
    /// everything else (including empty lists and maps) is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null | Self::Bool(false) => false,
            Self::Bool(true) | Self::List(_) | Self::Map(_) | Self::Func(_) => true,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Strict equality: same kind and equal payload.
    ///
    /// NaN is not strictly equal to itself; callables compare by identity;
    /// lists and maps compare structurally.
    #[must_use]
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.strict_eq(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.strict_eq(vb))
            }
            (Self::Func(a), Self::Func(b)) => a.identity_eq(b),
            _ => false,
        }
    }

    /// Loose equality: strict equality within a kind, plus `Null == Undefined`,
    /// boolean-to-number coercion, number/text coercion via ToNumber, and
    /// list/map-to-primitive coercion via ToString (`[1] == 1`).
    #[must_use]
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined | Self::Null, Self::Undefined | Self::Null) => true,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bool(_), _) => Self::Number(self.as_number()).loose_eq(other),
            (_, Self::Bool(_)) => self.loose_eq(&Self::Number(other.as_number())),
            (Self::Number(a), Self::Text(_)) => *a == other.as_number(),
            (Self::Text(_), Self::Number(b)) => self.as_number() == *b,
            (Self::Number(_) | Self::Text(_), Self::List(_) | Self::Map(_)) => {
                self.loose_eq(&Self::Text(other.to_string()))
            }
            (Self::List(_) | Self::Map(_), Self::Number(_) | Self::Text(_)) => {
                Self::Text(self.to_string()).loose_eq(other)
            }
            _ => self.strict_eq(other),
        }
    }

    /// SameValueZero: strict equality, except NaN equals NaN.
    ///
    /// This is the equality used by list membership.
    pub(crate) fn same_value_zero(&self, other: &Self) -> bool {
        if let (Self::Number(a), Self::Number(b)) = (self, other) {
            a == b || (a.is_nan() && b.is_nan())
        } else {
            self.strict_eq(other)
        }
    }

    /// ToNumber coercion: `Null` is 0, booleans are 0/1, text is parsed
    /// (empty text is 0, unparseable text is NaN), lists coerce through
    /// their string form, everything else is NaN.
    #[must_use]
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Undefined | Self::Map(_) | Self::Func(_) => f64::NAN,
            Self::Null | Self::Bool(false) => 0.0,
            Self::Bool(true) => 1.0,
            Self::Number(n) => *n,
            Self::Text(s) => parse_number(s),
            Self::List(_) => parse_number(&self.to_string()),
        }
    }

    /// Length of the subject, when it has one (text and lists).
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::Text(s) => Some(s.chars().count()),
            Self::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Property lookup: map entries by key, list elements by numeric index.
    /// Anything absent (or any other kind of subject) is `Undefined`.
    #[must_use]
    pub fn get(&self, key: &str) -> Self {
        match self {
            Self::Map(entries) => entries.get(key).cloned().unwrap_or(Self::Undefined),
            Self::List(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .cloned()
                .unwrap_or(Self::Undefined),
            _ => Self::Undefined,
        }
    }

    /// Invoke the subject as a zero-argument callable.
    ///
    /// # Errors
    ///
    /// Returns whatever the callable raised. Invoking a non-callable raises a
    /// `TypeError`-named [`Thrown`].
    pub fn invoke(&self) -> Result<(), Thrown> {
        match self {
            Self::Func(callable) => callable.call(),
            other => Err(Thrown::type_error(format!("{other} is not a function"))),
        }
    }

    /// Relational comparison: lexicographic when both sides are text, numeric
    /// (with ToNumber coercion) otherwise. NaN never compares.
    pub(crate) fn compare(&self, other: &Self) -> Option<Ordering> {
        if let (Self::Text(a), Self::Text(b)) = (self, other) {
            return Some(a.cmp(b));
        }
        self.as_number().partial_cmp(&other.as_number())
    }

    /// Structural pretty rendering for diagnostic diffs: multi-line JSON with
    /// two-space indentation. `Undefined` and callables render as their own
    /// markers at top level; nested inside a list they become `null` and
    /// nested inside a map the entry is omitted.
    #[must_use]
    pub fn render_pretty(&self) -> String {
        match self {
            Self::Undefined => "undefined".to_string(),
            Self::Func(_) => "[Function]".to_string(),
            other => serde_json::to_string_pretty(&other.to_json())
                .unwrap_or_else(|_| other.to_string()),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null | Self::Func(_) => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .filter(|(_, v)| !matches!(v, Self::Undefined | Self::Func(_)))
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_eq(other)
    }
}

/// ToString coercion: the textual form used in failure messages.
///
/// Lists join their elements with commas (`Null`/`Undefined` elements render
/// empty), maps render as `[object Object]`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !matches!(item, Self::Undefined | Self::Null) {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Self::Map(_) => f.write_str("[object Object]"),
            Self::Func(_) => f.write_str("[Function]"),
        }
    }
}

// Whole numbers serialize without a trailing fraction; NaN and the
// infinities have no JSON form and become null.
fn number_to_json(n: f64) -> serde_json::Value {
    if n.is_finite() && n.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(&n) {
        serde_json::Value::Number(serde_json::Number::from(n as i64))
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{n}")
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Number(f64::from(n))
    }
}

macro_rules! value_from_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::Number(n as f64)
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(entries: BTreeMap<String, T>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(entries: HashMap<String, T>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => {
                Self::Map(entries.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    mod truthiness_tests {
        use super::*;

        #[test]
        fn test_falsy_values() {
            assert!(!Value::Undefined.is_truthy());
            assert!(!Value::Null.is_truthy());
            assert!(!Value::Bool(false).is_truthy());
            assert!(!Value::Number(0.0).is_truthy());
            assert!(!Value::Number(f64::NAN).is_truthy());
            assert!(!Value::Text(String::new()).is_truthy());
        }

        #[test]
        fn test_truthy_values() {
            assert!(Value::Bool(true).is_truthy());
            assert!(Value::Number(-1.0).is_truthy());
            assert!(Value::Text("0".to_string()).is_truthy());
            assert!(Value::List(Vec::new()).is_truthy());
            assert!(Value::Map(BTreeMap::new()).is_truthy());
            assert!(Value::func(|| Ok(())).is_truthy());
        }
    }

    mod equality_tests {
        use super::*;

        #[test]
        fn test_strict_eq_same_kind() {
            assert!(Value::from(1).strict_eq(&Value::from(1.0)));
            assert!(Value::from("a").strict_eq(&Value::from("a")));
            assert!(!Value::from(1).strict_eq(&Value::from(2)));
        }

        #[test]
        fn test_strict_eq_rejects_coercion() {
            assert!(!Value::from("1").strict_eq(&Value::from(1)));
            assert!(!Value::Null.strict_eq(&Value::Undefined));
            assert!(!Value::from(true).strict_eq(&Value::from(1)));
        }

        #[test]
        fn test_nan_is_not_strictly_equal_to_itself() {
            let nan = Value::Number(f64::NAN);
            assert!(!nan.strict_eq(&nan));
            assert!(nan.same_value_zero(&nan));
        }

        #[test]
        fn test_loose_eq_coerces() {
            assert!(Value::from("1").loose_eq(&Value::from(1)));
            assert!(Value::Null.loose_eq(&Value::Undefined));
            assert!(Value::from(true).loose_eq(&Value::from(1)));
            assert!(Value::from(false).loose_eq(&Value::from("")));
            assert!(Value::from(vec![1]).loose_eq(&Value::from(1)));
        }

        #[test]
        fn test_loose_eq_still_discriminates() {
            assert!(!Value::from("abc").loose_eq(&Value::from(1)));
            assert!(!Value::Null.loose_eq(&Value::from(0)));
            assert!(!Value::Undefined.loose_eq(&Value::from(0)));
        }

        #[test]
        fn test_structural_equality_for_collections() {
            let a = Value::from(json!({"x": [1, 2], "y": "z"}));
            let b = Value::from(json!({"x": [1, 2], "y": "z"}));
            let c = Value::from(json!({"x": [1, 3], "y": "z"}));
            assert!(a.strict_eq(&b));
            assert!(!a.strict_eq(&c));
        }

        #[test]
        fn test_callables_compare_by_identity() {
            let f = Value::func(|| Ok(()));
            let g = Value::func(|| Ok(()));
            assert!(f.strict_eq(&f.clone()));
            assert!(!f.strict_eq(&g));
        }
    }

    mod coercion_tests {
        use super::*;

        #[test]
        fn test_as_number() {
            assert!((Value::Null.as_number() - 0.0).abs() < f64::EPSILON);
            assert!((Value::from(true).as_number() - 1.0).abs() < f64::EPSILON);
            assert!((Value::from(" 42 ").as_number() - 42.0).abs() < f64::EPSILON);
            assert!((Value::from("").as_number() - 0.0).abs() < f64::EPSILON);
            assert!(Value::from("nope").as_number().is_nan());
            assert!(Value::Undefined.as_number().is_nan());
            assert!((Value::from(vec![5]).as_number() - 5.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_display_coercion() {
            assert_eq!(Value::from(3.0).to_string(), "3");
            assert_eq!(Value::from(3.5).to_string(), "3.5");
            assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
            assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
            assert_eq!(Value::Number(-0.0).to_string(), "0");
            assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "1,2,3");
            assert_eq!(Value::from(json!({"a": 1})).to_string(), "[object Object]");
            assert_eq!(Value::from(json!([null, 1])).to_string(), ",1");
            assert_eq!(Value::Undefined.to_string(), "undefined");
        }
    }

    mod access_tests {
        use super::*;

        #[test]
        fn test_get_on_map_and_list() {
            let map = Value::from(json!({"name": "ada"}));
            assert_eq!(map.get("name"), Value::from("ada"));
            assert_eq!(map.get("missing"), Value::Undefined);

            let list = Value::from(vec![10, 20]);
            assert_eq!(list.get("1"), Value::from(20));
            assert_eq!(list.get("9"), Value::Undefined);
        }

        #[test]
        fn test_length() {
            assert_eq!(Value::from("héllo").length(), Some(5));
            assert_eq!(Value::from(vec![1, 2]).length(), Some(2));
            assert_eq!(Value::from(1).length(), None);
            assert_eq!(Value::from(json!({"a": 1})).length(), None);
        }

        #[test]
        fn test_invoke_non_callable_raises_type_error() {
            let raised = Value::from(42).invoke().unwrap_err();
            assert_eq!(raised.name, "TypeError");
            assert!(raised.message.contains("42"));
        }

        #[test]
        fn test_invoke_callable() {
            assert!(Value::func(|| Ok(())).invoke().is_ok());
            let raised = Value::func(|| Err(Thrown::error("boom"))).invoke().unwrap_err();
            assert_eq!(raised.name, "Error");
        }
    }

    mod ordering_tests {
        use super::*;

        #[test]
        fn test_numeric_comparison_coerces() {
            assert_eq!(
                Value::from("10").compare(&Value::from(9)),
                Some(Ordering::Greater)
            );
        }

        #[test]
        fn test_text_comparison_is_lexicographic() {
            assert_eq!(
                Value::from("10").compare(&Value::from("9")),
                Some(Ordering::Less)
            );
        }

        #[test]
        fn test_nan_never_compares() {
            assert_eq!(Value::Number(f64::NAN).compare(&Value::from(1)), None);
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_render_pretty_scalars() {
            assert_eq!(Value::from(4).render_pretty(), "4");
            assert_eq!(Value::from("hi").render_pretty(), "\"hi\"");
            assert_eq!(Value::Null.render_pretty(), "null");
            assert_eq!(Value::Undefined.render_pretty(), "undefined");
            assert_eq!(Value::func(|| Ok(())).render_pretty(), "[Function]");
            assert_eq!(Value::Number(f64::NAN).render_pretty(), "null");
        }

        #[test]
        fn test_render_pretty_nests() {
            let rendered = Value::from(json!({"a": [1, 2]})).render_pretty();
            assert!(rendered.contains("\"a\": ["));
            assert!(rendered.lines().count() > 1);
        }

        #[test]
        fn test_render_pretty_drops_unserializable_members() {
            let mut entries = BTreeMap::new();
            entries.insert("keep".to_string(), Value::from(1));
            entries.insert("drop".to_string(), Value::Undefined);
            let rendered = Value::Map(entries).render_pretty();
            assert!(rendered.contains("keep"));
            assert!(!rendered.contains("drop"));

            let list = Value::List(vec![Value::Undefined, Value::from(1)]);
            assert_eq!(list.render_pretty(), "[\n  null,\n  1\n]");
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_from_primitives() {
            assert_eq!(Value::from(3_u8), Value::Number(3.0));
            assert_eq!(Value::from(-3_i64), Value::Number(-3.0));
            assert_eq!(Value::from("s".to_string()), Value::Text("s".to_string()));
            assert_eq!(Value::from(None::<i32>), Value::Null);
            assert_eq!(Value::from(Some(2)), Value::Number(2.0));
        }

        #[test]
        fn test_from_json() {
            let value = Value::from(json!({"n": 1, "list": ["a", null]}));
            assert_eq!(value.get("n"), Value::from(1));
            assert_eq!(value.get("list").get("1"), Value::Null);
            assert_eq!(value.kind(), Kind::Map);
        }

        #[test]
        fn test_kind_display() {
            assert_eq!(Kind::Text.to_string(), "string");
            assert_eq!(Kind::Func.to_string(), "function");
            assert_eq!(Value::Null.kind().to_string(), "null");
        }
    }
}
