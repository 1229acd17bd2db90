//! Binary codec (MessagePack).
//!
//! Encoding rules:
//! - `Value::Bytes` is written as msgpack `bin`, strings as `str`.
//! - Integers use the most compact msgpack representation.
//! - Maps are written in key order.
//!
//! Decoding rules:
//! - Map keys must be strings; `ext` values are rejected.
//! - Exactly one value per buffer; trailing bytes are an error.
//! - Non-negative integers come back as `Scalar::UInt`, negatives as
//!   `Scalar::Int`, whichever variant was written. Values built with
//!   `Value::from` already follow this, so they decode to themselves; a
//!   hand-built `Scalar::Int(3)` decodes as `Scalar::UInt(3)`.

use bytes::Bytes;
use rmpv::Value as Mp;

use crate::error::{Result, RoomcastError};
use crate::protocol::Envelope;
use crate::value::{Scalar, Value};

/// Serializes value trees for the wire.
pub trait Codec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<Bytes>;
    fn decode(&self, bytes: &[u8]) -> Result<Value>;
}

/// MessagePack codec understood by socket.io subscribers.
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgPackCodec;

impl Codec for MsgPackCodec {
    fn encode(&self, value: &Value) -> Result<Bytes> {
        let mut buf = Vec::with_capacity(64);
        rmpv::encode::write_value(&mut buf, &to_mp(value))
            .map_err(|e| RoomcastError::Encode(format!("msgpack write failed: {e}")))?;
        Ok(Bytes::from(buf))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let mut rd = bytes;
        let mp = rmpv::decode::read_value(&mut rd)
            .map_err(|e| RoomcastError::Decode(format!("msgpack read failed: {e}")))?;
        if !rd.is_empty() {
            return Err(RoomcastError::Decode(format!(
                "{} trailing bytes after envelope",
                rd.len()
            )));
        }
        from_mp(mp)
    }
}

/// Encode an envelope with `codec`.
pub fn encode_envelope(codec: &dyn Codec, env: &Envelope) -> Result<Bytes> {
    codec.encode(&env.to_value())
}

/// Decode an envelope published by an emitter.
pub fn decode_envelope(codec: &dyn Codec, bytes: &[u8]) -> Result<Envelope> {
    Envelope::from_value(&codec.decode(bytes)?)
}

fn to_mp(value: &Value) -> Mp {
    match value {
        Value::Scalar(s) => match s {
            Scalar::Nil => Mp::Nil,
            Scalar::Bool(b) => Mp::Boolean(*b),
            Scalar::Int(n) => Mp::from(*n),
            Scalar::UInt(n) => Mp::from(*n),
            Scalar::Float(f) => Mp::F64(*f),
            Scalar::Str(s) => Mp::from(s.as_str()),
        },
        Value::Seq(items) => Mp::Array(items.iter().map(to_mp).collect()),
        Value::Map(map) => Mp::Map(
            map.iter()
                .map(|(k, v)| (Mp::from(k.as_str()), to_mp(v)))
                .collect(),
        ),
        Value::Bytes(b) => Mp::Binary(b.to_vec()),
    }
}

fn from_mp(mp: Mp) -> Result<Value> {
    Ok(match mp {
        Mp::Nil => Value::nil(),
        Mp::Boolean(b) => Value::from(b),
        Mp::Integer(n) => {
            if let Some(u) = n.as_u64() {
                Value::from(u)
            } else if let Some(i) = n.as_i64() {
                Value::from(i)
            } else {
                return Err(RoomcastError::Decode("integer out of range".into()));
            }
        }
        Mp::F32(f) => Value::from(f),
        Mp::F64(f) => Value::from(f),
        Mp::String(s) => match s.into_str() {
            Some(s) => Value::from(s),
            None => return Err(RoomcastError::Decode("string is not valid utf-8".into())),
        },
        Mp::Binary(b) => Value::Bytes(Bytes::from(b)),
        Mp::Array(items) => Value::Seq(items.into_iter().map(from_mp).collect::<Result<_>>()?),
        Mp::Map(entries) => {
            let mut map = std::collections::BTreeMap::new();
            for (k, v) in entries {
                let key = match k {
                    Mp::String(s) => s
                        .into_str()
                        .ok_or_else(|| RoomcastError::Decode("map key is not valid utf-8".into()))?,
                    other => {
                        return Err(RoomcastError::Decode(format!("map key must be a string, got {other}")))
                    }
                };
                map.insert(key, from_mp(v)?);
            }
            Value::Map(map)
        }
        Mp::Ext(ty, _) => return Err(RoomcastError::Decode(format!("unsupported ext type {ty}"))),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::args;

    #[test]
    fn bytes_are_written_as_bin() {
        let out = MsgPackCodec.encode(&Value::from(vec![1u8, 2, 3])).unwrap();
        assert_eq!(&out[..], &[0xc4, 0x03, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn decode_inverts_encode_for_nested_trees() {
        let v = Value::Seq(args!["s", -7, 3i32, i64::MAX, 9u64, true, 0.5, vec![0xffu8], Value::nil()]);
        let bytes = MsgPackCodec.encode(&v).unwrap();
        assert_eq!(MsgPackCodec.decode(&bytes).unwrap(), v);
    }

    #[test]
    fn integers_decode_by_sign_not_by_variant() {
        let hand_built = Value::Scalar(Scalar::Int(3));
        let bytes = MsgPackCodec.encode(&hand_built).unwrap();
        assert_eq!(&bytes[..], &[0x03]);

        let back = MsgPackCodec.decode(&bytes).unwrap();
        assert_eq!(back, Value::Scalar(Scalar::UInt(3)));
        assert_eq!(back, Value::from(3i32));
        assert_eq!(back.as_i64(), hand_built.as_i64());
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let err = MsgPackCodec.decode(&[0xc0, 0xc0]).unwrap_err();
        assert_eq!(err.code().as_str(), "DECODE");
    }

    #[test]
    fn non_string_map_keys_are_rejected() {
        // {1: nil}
        let err = MsgPackCodec.decode(&[0x81, 0x01, 0xc0]).unwrap_err();
        assert_eq!(err.code().as_str(), "DECODE");
    }
}
