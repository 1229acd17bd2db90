//! roomcast core: transport-free protocol primitives and error types.
//!
//! This crate defines the wire-level contract between emitters and the
//! subscriber fleet: the argument value model, binary payload detection,
//! channel naming, the envelope shape, and its MessagePack codec. It carries
//! no transport or runtime dependencies so subscribers can reuse it too.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `RoomcastError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod binary;
pub mod channel;
pub mod codec;
pub mod error;
pub mod protocol;
pub mod value;

/// Shared result type.
pub use error::{ErrorCode, Result, RoomcastError};
pub use value::{Scalar, Value};
