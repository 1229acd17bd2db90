//! roomcast emitter library entry.
//!
//! This crate wires the config loader, the publish capability (Redis or
//! in-memory) and the `Emitter` into a broadcaster that backend processes
//! embed. It is consumed by the `roomcast-emit` binary and by integration
//! tests.

pub mod cli;
pub mod config;
pub mod emitter;
pub mod publisher;

pub use emitter::{Emission, Emitter, LastEmit};
pub use publisher::{MemoryPublisher, Publisher, RedisPublisher};
