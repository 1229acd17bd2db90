//! Top-level facade crate for roomcast.
//!
//! Re-exports core types and the emitter library so users can depend on a single crate.

pub mod core {
    pub use roomcast_core::*;
}

pub mod emitter {
    pub use roomcast_emitter::*;
}
