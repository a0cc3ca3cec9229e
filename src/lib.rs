// Domain layer: records, the MILP model and solver interfaces
pub mod domain;

// Packing core: model builder, solution extractor and failure reporting
pub mod packing;

// Application layer: input loading and the gRPC adapter
pub mod application;

// Infrastructure layer: logging, configuration, server
pub mod infrastructure;

// Solver adapters: Concrete implementations of SolverService
#[cfg(feature = "server")]
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Bin, ConstraintType, Item, LinearExpression, PackedBin, Packing, SolutionStatus,
    SolverBackend, SolverConfig, SolverEngine, SolverError, SolverService, SolverSession,
    VariableHandle,
};

pub use packing::{solve_with, BinPacker, UnsolvableError};

#[cfg(feature = "server")]
pub use infrastructure::{start_server, ServerConfig};

#[cfg(feature = "server")]
pub use solver::{CoinCbcSolver, HighsSolver, SolverFactory};

/// Pack `items` into `bins` with the default MILP backend.
#[cfg(feature = "server")]
pub fn solve(bins: &[Bin], items: &[Item]) -> Result<Packing, UnsolvableError> {
    BinPacker::new(SolverFactory::default_solver()).pack(bins, items)
}
