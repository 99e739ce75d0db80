// src/config.rs
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceKind {
    Local,
    /// Reserved for a live market-data provider; not wired up yet.
    Yahoo,
}

impl FromStr for DataSourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(DataSourceKind::Local),
            "yahoo" => Ok(DataSourceKind::Yahoo),
            other => Err(ConfigError::UnknownDataSource(other.to_string())),
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceKind::Local => write!(f, "local"),
            DataSourceKind::Yahoo => write!(f, "yahoo"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cannot parse PORT [{0}]")]
    InvalidPort(String),

    #[error("unknown DATASOURCE [{0}]")]
    UnknownDataSource(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub data_source: DataSourceKind,
}

impl Config {
    /// Reads `PORT` (required) and `DATASOURCE` (defaults to `local`).
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_vars(
            env::var("PORT").ok().as_deref(),
            env::var("DATASOURCE").ok().as_deref(),
        )
    }

    fn from_vars(port: Option<&str>, data_source: Option<&str>) -> Result<Config, ConfigError> {
        let port = port.unwrap_or_default();
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port.to_string()))?;

        let data_source = match data_source.map(str::trim) {
            None | Some("") => DataSourceKind::Local,
            Some(kind) => kind.parse()?,
        };

        Ok(Config { port, data_source })
    }
}
