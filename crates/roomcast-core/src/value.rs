//! Argument value tree.
//!
//! Event arguments are an arbitrary nested tree of scalars, sequences,
//! string-keyed maps and raw byte buffers. The variant set is closed so
//! every walk over it (binary detection, encoding, decoding) is checked for
//! exhaustiveness by the compiler.

use std::collections::BTreeMap;

use bytes::Bytes;

/// Leaf values that never carry binary payload.
///
/// msgpack does not keep signedness, so the conversions below store every
/// non-negative integer as `UInt` and only negatives as `Int`. That is the
/// form the codec decodes to.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

/// One node of an argument tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    /// Ordered sequence.
    Seq(Vec<Value>),
    /// String-keyed mapping (deterministic key order on the wire).
    Map(BTreeMap<String, Value>),
    /// Raw byte buffer (msgpack `bin`).
    Bytes(Bytes),
}

impl Value {
    pub fn nil() -> Self {
        Value::Scalar(Scalar::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Integer view; accepts both signed and unsigned encodings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Int(n)) => Some(*n),
            Value::Scalar(Scalar::UInt(n)) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                match u64::try_from(n) {
                    Ok(u) => Value::Scalar(Scalar::UInt(u)),
                    Err(_) => Value::Scalar(Scalar::Int(i64::from(n))),
                }
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Scalar(Scalar::UInt(u64::from(n)))
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Scalar(Scalar::Float(f64::from(f)))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Str(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Str(s))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

// Byte vectors are always treated as raw buffers, never as sequences of integers.
impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(b))
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(b))
    }
}

impl<const N: usize> From<[u8; N]> for Value {
    fn from(b: [u8; N]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(&b))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Seq(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Value::Map(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or_else(Value::nil, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match v {
            Json::Null => Value::nil(),
            Json::Bool(b) => b.into(),
            Json::Number(n) => {
                if let Some(u) = n.as_u64() {
                    u.into()
                } else if let Some(i) = n.as_i64() {
                    i.into()
                } else {
                    n.as_f64().map_or_else(Value::nil, Value::from)
                }
            }
            Json::String(s) => s.into(),
            Json::Array(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
            Json::Object(obj) => Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

/// Build a `Vec<Value>` argument list from heterogeneous expressions.
///
/// ```
/// use roomcast_core::args;
/// let a = args!["hello", 42, vec![1u8, 2, 3]];
/// assert_eq!(a.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::value::Value>::new() };
    ($($x:expr),+ $(,)?) => {
        ::std::vec![$($crate::value::Value::from($x)),+]
    };
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_objects_become_maps_without_bytes() {
        let v = Value::from(json!({"a": [1, -2, 1.5, null], "b": "x"}));
        let m = v.as_map().unwrap();
        let a = m["a"].as_seq().unwrap();
        assert_eq!(a[0], Value::Scalar(Scalar::UInt(1)));
        assert_eq!(a[1], Value::Scalar(Scalar::Int(-2)));
        assert_eq!(a[2], Value::Scalar(Scalar::Float(1.5)));
        assert_eq!(a[3], Value::nil());
        assert_eq!(m["b"].as_str(), Some("x"));
    }

    #[test]
    fn signed_integers_are_stored_by_sign() {
        assert_eq!(Value::from(3i32), Value::Scalar(Scalar::UInt(3)));
        assert_eq!(Value::from(0i8), Value::from(0u8));
        assert_eq!(Value::from(-3i64), Value::Scalar(Scalar::Int(-3)));
        assert_eq!(Value::from(i64::MAX).as_i64(), Some(i64::MAX));
    }

    #[test]
    fn byte_vectors_are_raw_buffers() {
        assert!(Value::from(vec![1u8, 2, 3]).as_bytes().is_some());
        assert!(Value::from([0u8; 4]).as_bytes().is_some());
    }
}
