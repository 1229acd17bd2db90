//! Emitter config loader (strict parsing).

pub mod schema;

use std::fs;

use roomcast_core::error::{Result, RoomcastError};

pub use schema::{EmitterConfig, Protocol, RedisSection};

pub fn load_from_file(path: &str) -> Result<EmitterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RoomcastError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<EmitterConfig> {
    let cfg: EmitterConfig = serde_yaml::from_str(s)
        .map_err(|e| RoomcastError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
