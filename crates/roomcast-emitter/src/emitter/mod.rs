//! Emitter: turns "emit this event to these rooms" into a channel name and
//! an encoded envelope, then hands both to the publish capability.
//!
//! Addressing is accumulated on an [`Emission`] value rather than on the
//! emitter itself, so one `Emitter` can be shared behind `Arc` by any number
//! of tasks without external locking.

mod emission;

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use roomcast_core::codec::{encode_envelope, Codec, MsgPackCodec};
use roomcast_core::error::Result;
use roomcast_core::protocol::{Envelope, Flag, PacketType};
use roomcast_core::Value;

use crate::config::EmitterConfig;
use crate::publisher::{Publisher, RedisPublisher};

pub use emission::Emission;

/// Channel and packet type of the most recent emit (diagnostics only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastEmit {
    pub channel: String,
    pub packet_type: PacketType,
}

/// Long-lived broadcaster bound to one channel prefix.
pub struct Emitter {
    prefix: String,
    publisher: Arc<dyn Publisher>,
    codec: Arc<dyn Codec>,
    last: Mutex<Option<LastEmit>>,
}

impl Emitter {
    pub fn new(prefix: impl Into<String>, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            prefix: prefix.into(),
            publisher,
            codec: Arc::new(MsgPackCodec),
            last: Mutex::new(None),
        }
    }

    /// Replace the default MessagePack codec.
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    /// Connect to Redis as described by `cfg`. Fails if the connection
    /// cannot be established; no emitter is returned in that case.
    pub async fn connect(cfg: &EmitterConfig) -> Result<Self> {
        cfg.validate()?;
        let publisher = RedisPublisher::from_config(&cfg.redis).await?;
        Ok(Self::new(cfg.redis.key.clone(), Arc::new(publisher)))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Start an empty emission.
    pub fn emission(&self) -> Emission<'_> {
        Emission::new(self)
    }

    pub fn join(&self) -> Emission<'_> {
        self.emission().flag(Flag::Join)
    }

    pub fn volatile(&self) -> Emission<'_> {
        self.emission().flag(Flag::Volatile)
    }

    pub fn broadcast(&self) -> Emission<'_> {
        self.emission().flag(Flag::Broadcast)
    }

    pub fn in_room(&self, room: impl Into<String>) -> Emission<'_> {
        self.emission().in_room(room)
    }

    pub fn to(&self, room: impl Into<String>) -> Emission<'_> {
        self.emission().in_room(room)
    }

    pub fn of(&self, namespace: impl Into<String>) -> Emission<'_> {
        self.emission().of(namespace)
    }

    /// Emit to the whole default namespace.
    pub async fn emit(&self, event: &str, args: Vec<Value>) -> Result<()> {
        self.emission().emit(event, args).await
    }

    pub async fn emit_binary(&self, event: &str, args: Vec<Value>) -> Result<()> {
        self.emission().emit_binary(event, args).await
    }

    pub fn last_emit(&self) -> Option<LastEmit> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_channel(&self) -> Option<String> {
        self.last_emit().map(|l| l.channel)
    }

    pub fn last_packet_type(&self) -> Option<PacketType> {
        self.last_emit().map(|l| l.packet_type)
    }

    /// Release the publish capability.
    pub async fn close(&self) -> Result<()> {
        self.publisher.close().await
    }

    /// Shared publish step: encode, record, publish. No retries.
    async fn publish(&self, channel: String, envelope: Envelope) -> Result<()> {
        let packet_type = envelope.packet.packet_type;
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(LastEmit {
            channel: channel.clone(),
            packet_type,
        });

        let payload = encode_envelope(self.codec.as_ref(), &envelope).map_err(|e| {
            warn!(channel = %channel, error = %e, "envelope encode failed, publish skipped");
            e
        })?;

        debug!(
            channel = %channel,
            packet_type = packet_type.code(),
            event = envelope.packet.event().unwrap_or_default(),
            rooms = envelope.options.rooms.len(),
            flags = envelope.options.flags.len(),
            bytes = payload.len(),
            "emit"
        );

        self.publisher.publish(&channel, payload).await.map_err(|e| {
            warn!(channel = %channel, error = %e, "publish failed");
            e
        })
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("prefix", &self.prefix)
            .field("last", &self.last_emit())
            .finish()
    }
}
