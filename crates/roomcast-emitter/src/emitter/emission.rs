//! Per-call emit intent: rooms, flags and namespace for one publish.

use roomcast_core::binary::any_binary;
use roomcast_core::channel::{build_channel, DEFAULT_NAMESPACE};
use roomcast_core::error::Result;
use roomcast_core::protocol::{Envelope, Flag, Flags, Options, Packet, PacketType, Rooms};
use roomcast_core::Value;

use crate::emitter::Emitter;

/// Pending addressing for one emit: target rooms, namespace override, flags.
///
/// Every modifier consumes the intent and hands it back, and `emit` consumes
/// it for good, so targeting never outlives the call it was built for and
/// two call sites can never observe each other's rooms or flags.
#[must_use = "an emission does nothing until `emit` or `emit_binary` is awaited"]
#[derive(Clone)]
pub struct Emission<'a> {
    emitter: &'a Emitter,
    rooms: Rooms,
    flags: Flags,
    nsp: Option<String>,
}

impl<'a> Emission<'a> {
    pub(crate) fn new(emitter: &'a Emitter) -> Self {
        Self {
            emitter,
            rooms: Rooms::new(),
            flags: Flags::new(),
            nsp: None,
        }
    }

    pub fn join(self) -> Self {
        self.flag(Flag::Join)
    }

    /// Subscribers may drop the message under load.
    pub fn volatile(self) -> Self {
        self.flag(Flag::Volatile)
    }

    pub fn broadcast(self) -> Self {
        self.flag(Flag::Broadcast)
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.set(flag);
        self
    }

    /// Limit emission to `room`. Targeting the same room twice is a no-op.
    pub fn in_room(mut self, room: impl Into<String>) -> Self {
        self.rooms.insert(room);
        self
    }

    /// Alias of [`Emission::in_room`].
    pub fn to(self, room: impl Into<String>) -> Self {
        self.in_room(room)
    }

    /// Send this emit to `namespace` instead of `/`.
    pub fn of(mut self, namespace: impl Into<String>) -> Self {
        self.nsp = Some(namespace.into());
        self
    }

    pub fn rooms(&self) -> &[String] {
        self.rooms.as_slice()
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Namespace this emission resolves to.
    pub fn namespace(&self) -> &str {
        self.nsp.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Channel this emission would be published on.
    pub fn channel(&self) -> String {
        build_channel(self.emitter.prefix(), self.namespace(), self.rooms.as_slice())
    }

    /// Emit `event` with `args`. The packet becomes a binary event if any
    /// argument holds a raw byte buffer at any depth.
    pub async fn emit(self, event: &str, args: Vec<Value>) -> Result<()> {
        let packet_type = if any_binary(&args) {
            PacketType::BinaryEvent
        } else {
            PacketType::Event
        };
        self.send(Packet::new(packet_type, event, args)).await
    }

    /// Emit `event` as a binary event without scanning `args`.
    pub async fn emit_binary(self, event: &str, args: Vec<Value>) -> Result<()> {
        self.send(Packet::new(PacketType::BinaryEvent, event, args)).await
    }

    async fn send(self, mut packet: Packet) -> Result<()> {
        let channel = self.channel();
        let Emission {
            emitter,
            rooms,
            flags,
            nsp,
        } = self;

        packet.nsp = nsp;
        let envelope = Envelope::new(
            packet,
            Options {
                rooms: rooms.into_vec(),
                flags,
            },
        );
        emitter.publish(channel, envelope).await
    }
}

impl std::fmt::Debug for Emission<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emission")
            .field("prefix", &self.emitter.prefix())
            .field("rooms", &self.rooms)
            .field("flags", &self.flags)
            .field("nsp", &self.nsp)
            .finish()
    }
}
