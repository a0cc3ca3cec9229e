// Domain module: records, the MILP model, and solver interfaces

pub mod models;
pub mod records;
pub mod solver_engine;
pub mod solver_service;
pub mod value_objects;

pub use models::*;
pub use records::*;
pub use solver_engine::*;
pub use solver_service::*;
pub use value_objects::*;
