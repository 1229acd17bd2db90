//! In-process pub/sub.
//!
//! Fans payloads out to channel subscribers. A `recording()` bus also keeps
//! every publish in order for assertions; that log is never trimmed, so it
//! belongs in tests, not in long-lived processes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tokio::sync::{mpsc, RwLock};

use roomcast_core::error::{Result, RoomcastError};

use crate::publisher::Publisher;

/// One recorded publish.
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub channel: String,
    pub payload: Bytes,
}

#[derive(Default)]
pub struct MemoryPublisher {
    record: bool,
    log: RwLock<Vec<Published>>,
    subscribers: DashMap<String, Vec<mpsc::Sender<Bytes>>>,
    fail_next: AtomicUsize,
    closed: AtomicBool,
}

impl MemoryPublisher {
    /// Fan-out only; nothing is kept after delivery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Like `new`, but also records every publish.
    pub fn recording() -> Self {
        Self {
            record: true,
            ..Self::default()
        }
    }

    pub fn is_recording(&self) -> bool {
        self.record
    }

    /// Receive payloads published on exactly `channel` from now on.
    pub fn subscribe(&self, channel: &str, capacity: usize) -> mpsc::Receiver<Bytes> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        self.subscribers
            .entry(channel.to_string())
            .or_default()
            .push(tx);
        rx
    }

    /// Make the next `n` publishes fail with a publish error.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub async fn published(&self) -> Vec<Published> {
        self.log.read().await.clone()
    }

    pub async fn published_count(&self) -> usize {
        self.log.read().await.len()
    }

    pub async fn take_published(&self) -> Vec<Published> {
        std::mem::take(&mut *self.log.write().await)
    }

    fn take_failure(&self) -> bool {
        self.fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(&self, channel: &str, payload: Bytes) -> Result<()> {
        if self.is_closed() {
            return Err(RoomcastError::Publish("publisher closed".into()));
        }
        if self.take_failure() {
            return Err(RoomcastError::Publish(format!("injected failure on {channel}")));
        }

        if self.record {
            self.log.write().await.push(Published {
                channel: channel.to_string(),
                payload: payload.clone(),
            });
        }

        // Lossy fan-out: a full subscriber queue drops the message.
        if let Some(mut subs) = self.subscribers.get_mut(channel) {
            subs.retain(|tx| !tx.is_closed());
            for tx in subs.iter() {
                let _ = tx.try_send(payload.clone());
            }
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.subscribers.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fans_out_to_exact_channel_only() {
        let bus = MemoryPublisher::recording();
        let mut lobby = bus.subscribe("socket.io#/#lobby#", 8);
        let mut all = bus.subscribe("socket.io#/#", 8);

        bus.publish("socket.io#/#lobby#", Bytes::from_static(b"x")).await.unwrap();

        assert_eq!(lobby.recv().await.unwrap(), Bytes::from_static(b"x"));
        assert!(all.try_recv().is_err());
        assert_eq!(bus.published_count().await, 1);
    }

    #[tokio::test]
    async fn injected_failures_are_counted_down() {
        let bus = MemoryPublisher::recording();
        bus.fail_next(1);
        assert!(bus.publish("c", Bytes::new()).await.is_err());
        assert!(bus.publish("c", Bytes::new()).await.is_ok());
        assert_eq!(bus.published_count().await, 1);
    }

    #[tokio::test]
    async fn closed_bus_rejects_publishes() {
        let bus = MemoryPublisher::new();
        bus.close().await.unwrap();
        let err = bus.publish("c", Bytes::new()).await.unwrap_err();
        assert_eq!(err.code().as_str(), "PUBLISH");
    }

    #[tokio::test]
    async fn plain_bus_delivers_without_keeping_history() {
        let bus = MemoryPublisher::new();
        assert!(!bus.is_recording());
        let mut rx = bus.subscribe("c", 4);

        for _ in 0..100 {
            bus.publish("c", Bytes::from_static(b"x")).await.unwrap();
            assert_eq!(rx.recv().await.unwrap(), Bytes::from_static(b"x"));
        }
        assert_eq!(bus.published_count().await, 0);
        assert!(bus.take_published().await.is_empty());
    }
}
