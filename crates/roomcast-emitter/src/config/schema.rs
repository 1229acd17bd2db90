use serde::Deserialize;
use roomcast_core::channel::{DEFAULT_PREFIX, DELIMITER};
use roomcast_core::error::{Result, RoomcastError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmitterConfig {
    pub version: u32,

    #[serde(default)]
    pub redis: RedisSection,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            redis: RedisSection::default(),
        }
    }
}

impl EmitterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RoomcastError::UnsupportedVersion);
        }

        self.redis.validate()?;

        Ok(())
    }
}

/// Transport protocol used to reach Redis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Tls,
    Unix,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisSection {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub port: u16,

    /// Full address; wins over `host` + `port`.
    #[serde(default)]
    pub addr: String,

    #[serde(default)]
    pub protocol: Protocol,

    /// Subscribe key, used as the channel prefix.
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for RedisSection {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 0,
            addr: String::new(),
            protocol: Protocol::default(),
            key: default_key(),
        }
    }
}

impl RedisSection {
    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(RoomcastError::BadConfig("redis.key must not be empty".into()));
        }
        if self.key.contains(DELIMITER) {
            return Err(RoomcastError::BadConfig(format!(
                "redis.key must not contain '{DELIMITER}'"
            )));
        }
        if self.protocol == Protocol::Tls {
            // The redis client is built without a TLS stack.
            return Err(RoomcastError::BadConfig(
                "redis.protocol tls is not supported by this build; use tcp or unix".into(),
            ));
        }
        if self.protocol == Protocol::Unix && self.addr.is_empty() {
            return Err(RoomcastError::BadConfig(
                "redis.addr (socket path) is required when protocol is unix".into(),
            ));
        }
        Ok(())
    }

    /// `addr` if set, else `host:port` if both set, else `localhost:6379`.
    pub fn resolved_addr(&self) -> String {
        if !self.addr.is_empty() {
            self.addr.clone()
        } else if !self.host.is_empty() && self.port > 0 {
            format!("{}:{}", self.host, self.port)
        } else {
            default_addr()
        }
    }

    /// Connection URL understood by the redis client.
    pub fn connection_url(&self) -> String {
        let addr = self.resolved_addr();
        match self.protocol {
            Protocol::Tcp => format!("redis://{addr}"),
            Protocol::Tls => format!("rediss://{addr}"),
            Protocol::Unix => format!("redis+unix://{addr}"),
        }
    }
}

fn default_key() -> String {
    DEFAULT_PREFIX.into()
}
fn default_addr() -> String {
    "localhost:6379".into()
}
