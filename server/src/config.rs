use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:2396";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIGTWO_ADDR {value:?} is not a socket address: {source}")]
    InvalidAddr {
        value: String,
        source: AddrParseError,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub log_filter: String,
    pub assets_dir: Option<PathBuf>,
}

impl Config {
    /// Reads `BIGTWO_ADDR`, `BIGTWO_LOG` and `BIGTWO_ASSETS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("BIGTWO_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                value: raw_addr.clone(),
                source,
            })?;
        let log_filter = lookup("BIGTWO_LOG")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let assets_dir = lookup("BIGTWO_ASSETS")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        Ok(Config {
            addr,
            log_filter,
            assets_dir,
        })
    }
}
