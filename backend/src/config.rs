use std::env;
use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:5050";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("READIT_ADDR {value:?} is not a socket address: {source}")]
    Addr {
        value: String,
        source: std::net::AddrParseError,
    },
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    /// Enables `/config` and debug logging.
    pub debug: bool,
}

impl Config {
    /// Reads `READIT_ADDR` and `READIT_DEBUG`, after loading a `.env` file if
    /// there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_values(env::var("READIT_ADDR").ok(), env::var("READIT_DEBUG").ok())
    }

    pub fn from_values(addr: Option<String>, debug: Option<String>) -> Result<Self, ConfigError> {
        let addr = addr.unwrap_or_else(|| DEFAULT_ADDR.to_owned());
        let addr = addr
            .parse()
            .map_err(|source| ConfigError::Addr { value: addr.clone(), source })?;
        let debug = matches!(
            debug.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("1" | "true" | "yes" | "on")
        );

        Ok(Config { addr, debug })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: ([0, 0, 0, 0], 5050).into(),
            debug: false,
        }
    }
}
