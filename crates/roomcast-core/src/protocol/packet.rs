//! Packet, flag and room primitives.

use std::collections::BTreeSet;

use crate::error::{Result, RoomcastError};
use crate::value::Value;

/// socket.io packet type carried in `packet.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    /// Plain event (`2`).
    Event,
    /// Event whose arguments carry raw binary (`5`).
    BinaryEvent,
}

impl PacketType {
    pub const fn code(self) -> u8 {
        match self {
            PacketType::Event => 2,
            PacketType::BinaryEvent => 5,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            2 => Ok(PacketType::Event),
            5 => Ok(PacketType::BinaryEvent),
            other => Err(RoomcastError::Decode(format!("unsupported packet type: {other}"))),
        }
    }
}

/// The event-type + data portion of an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub packet_type: PacketType,
    /// `[event, arg0, arg1, ...]`.
    pub data: Vec<Value>,
    /// Namespace override for this emit, if any.
    pub nsp: Option<String>,
}

impl Packet {
    /// Build `data` as the event name followed by the args, in call order.
    pub fn new(packet_type: PacketType, event: &str, args: Vec<Value>) -> Self {
        let mut data = Vec::with_capacity(args.len() + 1);
        data.push(Value::from(event));
        data.extend(args);
        Self {
            packet_type,
            data,
            nsp: None,
        }
    }

    pub fn event(&self) -> Option<&str> {
        self.data.first().and_then(Value::as_str)
    }

    pub fn args(&self) -> &[Value] {
        self.data.get(1..).unwrap_or_default()
    }
}

/// Delivery modifier carried in the envelope's `flags` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    Broadcast,
    Join,
    /// Subscribers may drop the message under load.
    Volatile,
}

impl Flag {
    pub const ALL: [Flag; 3] = [Flag::Broadcast, Flag::Join, Flag::Volatile];

    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Broadcast => "broadcast",
            Flag::Join => "join",
            Flag::Volatile => "volatile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Flag::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

/// Set of active flags. Encoded as `{name: true}` for each member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags(BTreeSet<Flag>);

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, flag: Flag) {
        self.0.insert(flag);
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.0.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Ordered, duplicate-free room list (first-seen order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rooms(Vec<String>);

impl Rooms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `room` unless already present. Returns whether it was added.
    pub fn insert(&mut self, room: impl Into<String>) -> bool {
        let room = room.into();
        if self.0.contains(&room) {
            return false;
        }
        self.0.push(room);
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Rooms {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut rooms = Rooms::new();
        for r in iter {
            rooms.insert(r);
        }
        rooms
    }
}
