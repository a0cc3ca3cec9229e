// MILP backends implementing SolverService

mod coin_cbc_solver;
mod factory;
mod highs_solver;

pub use coin_cbc_solver::CoinCbcSolver;
pub use factory::SolverFactory;
pub use highs_solver::HighsSolver;
