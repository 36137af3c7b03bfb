//! JSON value types.
//!
//! [`Value`] is the fully-realised, non-lazy counterpart of the lazy
//! container tree: it is what [`crate::to_standard_types`] produces and what
//! [`crate::load`] returns for scalar documents.

use indexmap::IndexMap;
use num_bigint::BigInt;

/// An ordered map from JSON object keys to values.
///
/// Backed by [`indexmap::IndexMap`] so that key order always matches
/// insertion (first-seen) order, per the data model's object invariant.
pub type Map = IndexMap<String, Value>;

/// A JSON array of values.
pub type Array = Vec<Value>;

/// A JSON number: an arbitrary-precision integer when the lexical form had
/// no `.`, `e`, or `E`, otherwise an IEEE-754 binary64 float.
///
/// # Examples
///
/// ```
/// use lazyjson::Number;
///
/// let n: Number = "123456789012345678901234567890".parse().unwrap();
/// assert!(n.as_bigint().is_some());
/// assert!(n.as_f64().is_some()); // always convertible, possibly lossily
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// An arbitrary-precision integer.
    Int(BigInt),
    /// A binary64 floating-point value.
    Float(f64),
}

impl Number {
    /// Returns the arbitrary-precision integer, if this number was lexically
    /// an integer.
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Self::Int(i) => Some(i),
            Self::Float(_) => None,
        }
    }

    /// Returns the floating-point value, converting an integer losslessly
    /// where it fits and lossily (by rounding) otherwise.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            // BigInt's Display gives an exact decimal string; parsing it as
            // f64 rounds the same way a literal of that magnitude would.
            Self::Int(i) => i.to_string().parse::<f64>().ok(),
            Self::Float(f) => Some(*f),
        }
    }
}

/// Error returned by [`Number`]'s [`FromStr`](core::str::FromStr) impl.
#[derive(Debug, thiserror::Error)]
#[error("invalid numeric literal: {0:?}")]
pub struct ParseNumberError(String);

impl core::str::FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(['.', 'e', 'E']) {
            s.parse::<f64>()
                .map(Self::Float)
                .map_err(|_| ParseNumberError(s.to_owned()))
        } else {
            s.parse::<BigInt>()
                .map(Self::Int)
                .map_err(|_| ParseNumberError(s.to_owned()))
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Self::Int(BigInt::from(v))
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// A fully-realised JSON value, as defined by [RFC 8259].
///
/// # Examples
///
/// ```
/// use lazyjson::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Object(map);
/// assert!(v.is_object());
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The JSON `null` literal.
    Null,
    /// A JSON boolean.
    Boolean(bool),
    /// A JSON number.
    Number(Number),
    /// A JSON string.
    String(String),
    /// A JSON array.
    Array(Array),
    /// A JSON object, keys in first-seen order.
    Object(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(Number::Float(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Value::Boolean`].
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` if the value is [`Value::Number`].
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is [`Value::String`].
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Value::Array`].
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Value::Object`].
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Returns the string slice, if this value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the array slice, if this value is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the object map, if this value is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }
}
