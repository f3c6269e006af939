//! Dynamic record value type.

use crate::record::Record;

/// A dynamic record value.
///
/// Every field of a [`Record`] holds one of these. Comparisons always
/// switch on the variant; there is no implicit coercion between variants,
/// so a number never equals a string and a missing field never equals
/// [`Value::Null`] unless the caller asks for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value in any supported representation.
    Number(Number),
    /// Text string (UTF-8).
    String(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Nested mapping from field names to values.
    Object(Record),
}

/// A numeric value.
///
/// The representation is kept as written so that large `i64`/`u64` values
/// survive a round trip without going through `f64`. Equality is numeric
/// across representations: `Int(20)`, `UInt(20)` and `Float(20.0)` are all
/// equal.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point.
    Float(f64),
}

impl Number {
    /// Converts to the common `f64` representation used by comparisons.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::UInt(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    /// Returns the value as `i64` if it is an integer that fits.
    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::Int(n) => Some(n),
            Number::UInt(n) => i64::try_from(n).ok(),
            Number::Float(_) => None,
        }
    }

    /// Returns the value as `u64` if it is a non-negative integer.
    #[must_use]
    pub fn as_u64(self) -> Option<u64> {
        match self {
            Number::Int(n) => u64::try_from(n).ok(),
            Number::UInt(n) => Some(n),
            Number::Float(_) => None,
        }
    }

    /// Returns true if the value is stored as a float.
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Exact integral value, if there is one.
    ///
    /// Floats qualify only when finite, without a fractional part, and
    /// inside the range where the `i128` cast is exact.
    #[allow(clippy::cast_possible_truncation)]
    fn integral(self) -> Option<i128> {
        match self {
            Number::Int(n) => Some(i128::from(n)),
            Number::UInt(n) => Some(i128::from(n)),
            Number::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e38 => {
                Some(f as i128)
            }
            Number::Float(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.integral(), other.integral()) {
            (Some(a), Some(b)) => a == b,
            #[allow(clippy::float_cmp)]
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl Value {
    /// Returns a short name for this value's variant.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as a number, if it is one.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value converted to `f64`, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    /// Get this value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value as a nested record, if it is an object.
    pub fn as_object(&self) -> Option<&Record> {
        match self {
            Value::Object(r) => Some(r),
            _ => None,
        }
    }

    /// Look up a field in this object value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_object().and_then(|r| r.get(field))
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::Int(i64::from(n)))
                }
            }
        )*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::UInt(u64::from(n)))
                }
            }
        )*
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<isize> for Value {
    fn from(n: isize) -> Self {
        // isize is at most 64 bits on every supported target
        Value::Number(Number::Int(n as i64))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(Number::UInt(n as u64))
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Number(Number::Float(f64::from(f)))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Object(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}
