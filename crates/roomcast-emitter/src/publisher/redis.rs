//! Redis `PUBLISH` transport.

use async_trait::async_trait;
use bytes::Bytes;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tokio::sync::Mutex;
use tracing::{info, trace};

use roomcast_core::error::{Result, RoomcastError};

use crate::config::RedisSection;
use crate::publisher::Publisher;

/// Publishes envelopes with Redis `PUBLISH`.
///
/// Reconnects are handled by the `ConnectionManager`; a failed publish is
/// reported once and not retried. `close` drops the manager, after which
/// every publish fails.
pub struct RedisPublisher {
    conn: Mutex<Option<ConnectionManager>>,
    url: String,
}

impl RedisPublisher {
    /// Connect to `url` (e.g. `redis://localhost:6379`).
    pub async fn connect(url: &str) -> Result<Self> {
        let client = open_client(url)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| RoomcastError::Connection(format!("{url}: {e}")))?;

        info!(url = %url, "connected to redis");

        Ok(Self {
            conn: Mutex::new(Some(conn)),
            url: url.to_string(),
        })
    }

    pub async fn from_config(cfg: &RedisSection) -> Result<Self> {
        Self::connect(&cfg.connection_url()).await
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn is_closed(&self) -> bool {
        self.conn.lock().await.is_none()
    }
}

/// Parse `url` into a client without connecting.
pub fn open_client(url: &str) -> Result<Client> {
    Client::open(url).map_err(|e| RoomcastError::Connection(format!("invalid redis url {url}: {e}")))
}

#[async_trait]
impl Publisher for RedisPublisher {
    async fn publish(&self, channel: &str, payload: Bytes) -> Result<()> {
        // Clone out so the lock is not held across the round trip.
        let mut conn = self
            .conn
            .lock()
            .await
            .clone()
            .ok_or_else(|| RoomcastError::Publish("publisher closed".into()))?;
        let receivers: i64 = conn
            .publish(channel, &payload[..])
            .await
            .map_err(|e| RoomcastError::Publish(format!("redis publish on {channel}: {e}")))?;
        trace!(channel, receivers, "redis publish");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        // The socket goes away once in-flight publishes drop their clones.
        if self.conn.lock().await.take().is_some() {
            info!(url = %self.url, "redis publisher closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tcp_and_unix_urls_open_without_connecting() {
        assert!(open_client("redis://127.0.0.1:6379").is_ok());
        assert!(open_client("redis+unix:///var/run/redis.sock").is_ok());
    }

    #[test]
    fn malformed_url_is_a_connection_error() {
        let err = open_client("not a url").unwrap_err();
        assert_eq!(err.code().as_str(), "CONNECTION");
    }
}
