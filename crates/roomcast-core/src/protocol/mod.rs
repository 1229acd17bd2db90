//! Protocol modules (packet primitives + envelope shape).
//!
//! These types describe what subscribers receive on a channel. They are
//! transport-agnostic: the codec turns an `Envelope` into bytes, the emitter
//! decides which channel those bytes go to.

pub mod envelope;
pub mod packet;

pub use envelope::{Envelope, Options};
pub use packet::{Flag, Flags, Packet, PacketType, Rooms};
