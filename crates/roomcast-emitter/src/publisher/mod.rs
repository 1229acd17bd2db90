//! Publish capability (pub/sub transport seam).
//!
//! The emitter only needs "publish these bytes on this channel". Payload
//! bytes must reach subscribers untouched. Retries, pooling and reconnects
//! belong to the implementation, never to the emitter.

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use bytes::Bytes;

use roomcast_core::error::Result;

pub use self::memory::{MemoryPublisher, Published};
pub use self::redis::RedisPublisher;

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Fire-and-forget publish of `payload` on `channel`.
    async fn publish(&self, channel: &str, payload: Bytes) -> Result<()>;

    /// Release the underlying transport.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
