// Server configuration read from the environment
//
// PACKOPT_ADDR        listen address        (0.0.0.0:50051)
// PACKOPT_SOLVER      auto | cbc | highs    (auto)
// PACKOPT_TIME_LIMIT  seconds per solve     (unset: no limit)
// PACKOPT_BINS_CSV    default bins file     (data/bins.csv)
// PACKOPT_ITEMS_CSV   default items file    (data/items.csv)

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::application::DefaultInstance;
use crate::domain::{SolverBackend, SolverConfig};

const DEFAULT_ADDR: &str = "0.0.0.0:50051";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub solver: SolverConfig,
    pub default_instance: DefaultInstance,
}

impl ServerConfig {
    pub fn new(address: SocketAddr, solver: SolverConfig, default_instance: DefaultInstance) -> Self {
        Self {
            address,
            solver,
            default_instance,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let address: SocketAddr = get("PACKOPT_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "PACKOPT_ADDR",
                reason: e.to_string(),
            })?;

        let backend = match get("PACKOPT_SOLVER") {
            Some(value) => value
                .parse::<SolverBackend>()
                .map_err(|reason| ConfigError::Invalid {
                    key: "PACKOPT_SOLVER",
                    reason,
                })?,
            None => SolverBackend::Auto,
        };

        let time_limit = match get("PACKOPT_TIME_LIMIT") {
            Some(value) => {
                let seconds: f64 = value.trim().parse().map_err(|e: std::num::ParseFloatError| {
                    ConfigError::Invalid {
                        key: "PACKOPT_TIME_LIMIT",
                        reason: e.to_string(),
                    }
                })?;
                if !seconds.is_finite() || seconds <= 0.0 {
                    return Err(ConfigError::Invalid {
                        key: "PACKOPT_TIME_LIMIT",
                        reason: format!("expected a positive number of seconds, got {}", seconds),
                    });
                }
                Some(seconds)
            }
            None => None,
        };

        let default_instance = DefaultInstance {
            bins_csv: get("PACKOPT_BINS_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/bins.csv")),
            items_csv: get("PACKOPT_ITEMS_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/items.csv")),
        };

        Ok(Self::new(
            address,
            SolverConfig::default()
                .with_backend(backend)
                .with_time_limit(time_limit),
            default_instance,
        ))
    }
}
