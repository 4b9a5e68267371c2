use num_traits::ToPrimitive;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;

/// Trait bound shared by every type usable as a terminal label.
pub trait Label: Debug + Clone + Ord + Hash + Send + Sync + 'static {}
impl<T> Label for T where T: Debug + Clone + Ord + Hash + Send + Sync + 'static {}

/// A single attribute value, either numeric or nominal.
///
/// Whether a value is compared as a threshold or matched for equality is decided by the
/// kind of the value itself, never by the column it came from.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Nominal(String),
}

impl Value {
    /// Creates a numeric value from any primitive number.
    ///
    /// Numbers that cannot be represented as `f64` become `NaN`, which never matches.
    pub fn number<N: ToPrimitive>(n: N) -> Self {
        Value::Number(n.to_f64().unwrap_or(f64::NAN))
    }

    /// Creates a nominal value, matched by equality.
    pub fn nominal(s: impl Into<String>) -> Self {
        Value::Nominal(s.into())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// The number held by a numeric value, `None` for a nominal one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Nominal(_) => None,
        }
    }

    pub fn as_nominal(&self) -> Option<&str> {
        match self {
            Value::Nominal(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    /// Tests this attribute value against a split value.
    ///
    /// A numeric split value matches numbers greater than or equal to it; a nominal one
    /// matches equal strings. Values of the other kind never match.
    pub fn matches(&self, split_value: &Value) -> bool {
        match (split_value, self) {
            (Value::Number(threshold), Value::Number(x)) => x >= threshold,
            (Value::Nominal(expected), Value::Nominal(x)) => x == expected,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Nominal(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::number(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Nominal(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Nominal(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_match_is_inclusive_threshold() {
        let threshold = Value::from(20);
        assert!(Value::from(20).matches(&threshold));
        assert!(Value::from(24.5).matches(&threshold));
        assert!(!Value::from(19).matches(&threshold));
    }

    #[test]
    fn test_nominal_match_is_equality() {
        let expected = Value::from("google");
        assert!(Value::from("google").matches(&expected));
        assert!(!Value::from("digg").matches(&expected));
    }

    #[test]
    fn test_mixed_kinds_never_match() {
        assert!(!Value::from("20").matches(&Value::from(20)));
        assert!(!Value::from(20).matches(&Value::from("20")));
    }

    #[test]
    fn test_nan_never_matches() {
        let threshold = Value::from(1.0);
        assert!(!Value::Number(f64::NAN).matches(&threshold));
        assert!(!Value::from(1.0).matches(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_number_from_primitive() {
        assert_eq!(Value::number(3u8), Value::Number(3.0));
        assert_eq!(Value::number(-2i64).as_number(), Some(-2.0));
        assert!(Value::number(1.5f32).is_numeric());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(21).to_string(), "21");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from("UK").to_string(), "UK");
        assert_eq!(Value::from("UK").as_nominal(), Some("UK"));
    }
}
