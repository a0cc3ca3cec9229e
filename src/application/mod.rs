// Application layer: input loading and the gRPC adapter

pub mod loader;

#[cfg(feature = "server")]
pub mod grpc_service;
#[cfg(feature = "server")]
pub mod mappers;

#[cfg(feature = "server")]
pub use grpc_service::{DefaultInstance, GrpcBinPackingService, SolverProvider};
pub use loader::{load_bins, load_items, LoadError};
