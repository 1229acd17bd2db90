//! Command line of the `roomcast-emit` binary.
//!
//! ```text
//! roomcast-emit [--config PATH] [--room R]... [--nsp NSP]
//!               [--join] [--volatile] [--broadcast] [--binary]
//!               EVENT [ARG]...
//! ```
//!
//! Each `ARG` is parsed as JSON; anything that is not valid JSON is sent as
//! a plain string.

use clap::Parser;

use roomcast_core::error::Result;
use roomcast_core::protocol::Flag;
use roomcast_core::Value;

use crate::emitter::{Emission, Emitter};

pub const DEFAULT_CONFIG_PATH: &str = "roomcast.yaml";

/// Publish one event to every subscriber of the shared channel and exit.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(
    name = "roomcast-emit",
    about = "Broadcast one event to socket.io-style servers through Redis",
    version
)]
pub struct EmitCommand {
    /// YAML config file.
    #[arg(long = "config", default_value = DEFAULT_CONFIG_PATH, env = "ROOMCAST_CONFIG")]
    pub config_path: String,

    /// Target room; repeat for several rooms.
    #[arg(long = "room", value_name = "ROOM")]
    pub rooms: Vec<String>,

    /// Namespace override for this emit (default `/`).
    #[arg(long)]
    pub nsp: Option<String>,

    #[arg(long)]
    pub join: bool,

    #[arg(long)]
    pub volatile: bool,

    #[arg(long)]
    pub broadcast: bool,

    /// Force a binary event (skip detection).
    #[arg(long)]
    pub binary: bool,

    /// Event name.
    pub event: String,

    /// Event arguments, JSON or plain strings.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARG")]
    pub args: Vec<String>,
}

impl EmitCommand {
    /// Flags selected on the command line, in wire order.
    pub fn flags(&self) -> Vec<Flag> {
        Flag::ALL
            .into_iter()
            .filter(|f| match f {
                Flag::Join => self.join,
                Flag::Volatile => self.volatile,
                Flag::Broadcast => self.broadcast,
            })
            .collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.args.iter().map(|a| parse_arg(a)).collect()
    }

    /// Apply rooms, namespace and flags to a fresh emission.
    pub fn emission<'a>(&self, emitter: &'a Emitter) -> Emission<'a> {
        let mut emission = emitter.emission();
        for room in &self.rooms {
            emission = emission.in_room(room.as_str());
        }
        if let Some(nsp) = &self.nsp {
            emission = emission.of(nsp.as_str());
        }
        for flag in self.flags() {
            emission = emission.flag(flag);
        }
        emission
    }

    pub async fn run(self, emitter: &Emitter) -> Result<()> {
        let emission = self.emission(emitter);
        let args = self.values();
        if self.binary {
            emission.emit_binary(&self.event, args).await
        } else {
            emission.emit(&self.event, args).await
        }
    }
}

fn parse_arg(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw))
}
