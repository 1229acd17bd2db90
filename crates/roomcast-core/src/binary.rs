//! Binary payload detection.
//!
//! A single raw byte buffer anywhere in an argument tree forces the whole
//! packet into binary-event mode.

use crate::value::Value;

/// True iff `value` holds a raw byte buffer at any depth.
pub fn contains_binary(value: &Value) -> bool {
    match value {
        Value::Bytes(_) => true,
        Value::Seq(items) => any_binary(items),
        Value::Map(map) => map.values().any(contains_binary),
        Value::Scalar(_) => false,
    }
}

/// True iff any of `values` holds a raw byte buffer. Stops at the first hit.
pub fn any_binary(values: &[Value]) -> bool {
    values.iter().any(contains_binary)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::args;

    #[test]
    fn scalars_are_never_binary() {
        assert!(!any_binary(&args!["hello", 1, -1, 2.5, true]));
        assert!(!contains_binary(&Value::nil()));
    }

    #[test]
    fn empty_containers_are_not_binary() {
        assert!(!any_binary(&[]));
        assert!(!contains_binary(&Value::Seq(vec![])));
        assert!(!contains_binary(&Value::Map(BTreeMap::new())));
    }

    #[test]
    fn finds_buffers_at_any_depth() {
        let mut inner = BTreeMap::new();
        inner.insert("blob".to_string(), Value::from(vec![0xdeu8, 0xad]));
        let tree = Value::Seq(vec![
            Value::from("a"),
            Value::Seq(vec![Value::from(1), Value::Map(inner)]),
        ]);
        assert!(contains_binary(&tree));
        assert!(any_binary(&args!["x", tree]));
    }

    #[test]
    fn empty_buffer_still_counts() {
        assert!(contains_binary(&Value::from(Vec::<u8>::new())));
    }
}
