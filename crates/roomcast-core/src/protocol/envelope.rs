//! Envelope wire shape.
//!
//! An envelope is the msgpack array `[packet, options]`:
//!
//! ```text
//! packet  = { "type": 2 | 5, "data": [event, args...], "nsp"?: string }
//! options = { "rooms": [string...], "flags": { name: true, ... } }
//! ```
//!
//! `nsp` is present only when the emit selected a namespace. Decoding is
//! panic-free: any shape mismatch is reported as `RoomcastError::Decode`.

use std::collections::BTreeMap;

use crate::error::{Result, RoomcastError};
use crate::protocol::packet::{Flag, Flags, Packet, PacketType};
use crate::value::Value;

const KEY_TYPE: &str = "type";
const KEY_DATA: &str = "data";
const KEY_NSP: &str = "nsp";
const KEY_ROOMS: &str = "rooms";
const KEY_FLAGS: &str = "flags";

/// Addressing snapshot taken at emit time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub rooms: Vec<String>,
    pub flags: Flags,
}

/// Full value published for one emit.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub packet: Packet,
    pub options: Options,
}

impl Envelope {
    pub fn new(packet: Packet, options: Options) -> Self {
        Self { packet, options }
    }

    /// Wire value tree handed to the codec.
    pub fn to_value(&self) -> Value {
        let mut packet = BTreeMap::new();
        packet.insert(KEY_TYPE.to_string(), Value::from(self.packet.packet_type.code()));
        packet.insert(KEY_DATA.to_string(), Value::Seq(self.packet.data.clone()));
        if let Some(nsp) = &self.packet.nsp {
            packet.insert(KEY_NSP.to_string(), Value::from(nsp.as_str()));
        }

        let flags: BTreeMap<String, Value> = self
            .options
            .flags
            .iter()
            .map(|f| (f.as_str().to_string(), Value::from(true)))
            .collect();

        let mut options = BTreeMap::new();
        options.insert(
            KEY_ROOMS.to_string(),
            Value::Seq(self.options.rooms.iter().map(|r| Value::from(r.as_str())).collect()),
        );
        options.insert(KEY_FLAGS.to_string(), Value::Map(flags));

        Value::Seq(vec![Value::Map(packet), Value::Map(options)])
    }

    /// Rebuild an envelope from a decoded wire value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let parts = value
            .as_seq()
            .ok_or_else(|| RoomcastError::Decode("envelope must be an array".into()))?;
        let [packet, options] = parts else {
            return Err(RoomcastError::Decode(format!(
                "envelope must have 2 elements, got {}",
                parts.len()
            )));
        };

        Ok(Self {
            packet: decode_packet(packet)?,
            options: decode_options(options)?,
        })
    }
}

fn decode_packet(value: &Value) -> Result<Packet> {
    let map = value
        .as_map()
        .ok_or_else(|| RoomcastError::Decode("packet must be a map".into()))?;

    let code = map
        .get(KEY_TYPE)
        .and_then(Value::as_i64)
        .ok_or_else(|| RoomcastError::Decode("packet.type missing or not an integer".into()))?;
    let packet_type = PacketType::from_code(code)?;

    let data = map
        .get(KEY_DATA)
        .and_then(Value::as_seq)
        .ok_or_else(|| RoomcastError::Decode("packet.data missing or not an array".into()))?;
    if data.first().and_then(Value::as_str).is_none() {
        return Err(RoomcastError::Decode("packet.data must start with an event name".into()));
    }

    let nsp = match map.get(KEY_NSP) {
        None => None,
        Some(v) => Some(
            v.as_str()
                .ok_or_else(|| RoomcastError::Decode("packet.nsp must be a string".into()))?
                .to_string(),
        ),
    };

    Ok(Packet {
        packet_type,
        data: data.to_vec(),
        nsp,
    })
}

fn decode_options(value: &Value) -> Result<Options> {
    let map = value
        .as_map()
        .ok_or_else(|| RoomcastError::Decode("options must be a map".into()))?;

    let rooms = match map.get(KEY_ROOMS) {
        None => Vec::new(),
        Some(v) => v
            .as_seq()
            .ok_or_else(|| RoomcastError::Decode("options.rooms must be an array".into()))?
            .iter()
            .map(|r| {
                r.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| RoomcastError::Decode("room names must be strings".into()))
            })
            .collect::<Result<Vec<_>>>()?,
    };

    let mut flags = Flags::new();
    if let Some(v) = map.get(KEY_FLAGS) {
        let raw = v
            .as_map()
            .ok_or_else(|| RoomcastError::Decode("options.flags must be a map".into()))?;
        for (name, on) in raw {
            // Unknown flags are skipped so newer publishers stay readable.
            if let (Some(flag), Some(true)) = (Flag::parse(name), on.as_bool()) {
                flags.set(flag);
            }
        }
    }

    Ok(Options { rooms, flags })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::args;

    fn sample() -> Envelope {
        let mut packet = Packet::new(PacketType::BinaryEvent, "file", args![vec![1u8, 2]]);
        packet.nsp = Some("/admin".into());
        let options = Options {
            rooms: vec!["lobby".into(), "vip".into()],
            flags: [Flag::Volatile, Flag::Join].into_iter().collect(),
        };
        Envelope::new(packet, options)
    }

    #[test]
    fn value_shape_matches_wire_contract() {
        let v = sample().to_value();
        let parts = v.as_seq().unwrap();
        assert_eq!(parts.len(), 2);

        let packet = parts[0].as_map().unwrap();
        assert_eq!(packet["type"].as_i64(), Some(5));
        assert_eq!(packet["nsp"].as_str(), Some("/admin"));

        let options = parts[1].as_map().unwrap();
        assert_eq!(options["rooms"].as_seq().unwrap().len(), 2);
        let flags = options["flags"].as_map().unwrap();
        assert_eq!(flags.len(), 2);
        assert_eq!(flags["volatile"].as_bool(), Some(true));
        assert_eq!(flags["join"].as_bool(), Some(true));
    }

    #[test]
    fn nsp_is_omitted_without_override() {
        let env = Envelope::new(Packet::new(PacketType::Event, "x", vec![]), Options::default());
        let v = env.to_value();
        let packet = v.as_seq().unwrap()[0].as_map().unwrap();
        assert!(!packet.contains_key("nsp"));
    }

    #[test]
    fn from_value_inverts_to_value() {
        let env = sample();
        assert_eq!(Envelope::from_value(&env.to_value()).unwrap(), env);
    }

    #[test]
    fn rejects_three_element_envelopes() {
        let v = Value::Seq(vec![Value::from("emitter"), Value::nil(), Value::nil()]);
        let err = Envelope::from_value(&v).unwrap_err();
        assert_eq!(err.code().as_str(), "DECODE");
    }
}
