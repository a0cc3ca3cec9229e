// Infrastructure: logging, configuration and the gRPC server

pub mod logging;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "server")]
pub use config::{ConfigError, ServerConfig};
#[cfg(feature = "server")]
pub use server::start_server;
