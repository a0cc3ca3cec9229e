//! Multi-objective bin packing as a MILP.
//!
//! Every item goes into exactly one bin, no bin exceeds its capacity, and the
//! model minimizes the number of bins used, then their cost and committed
//! volume (as a weighted sum, see [`count_penalty`]).

pub mod builder;
pub mod error;
pub mod extractor;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use crate::domain::{
    Bin, Item, Packing, SolutionStatus, SolverConfig, SolverEngine, SolverService, SolverSession,
};

pub use builder::{build, count_penalty, ModelVariables};
pub use error::UnsolvableError;
pub use extractor::extract;

/// Build the model into `engine`, solve it, and read back the packing.
///
/// `engine` must be fresh; it is consumed by this one solve.
pub fn solve_with<E: SolverEngine + ?Sized>(
    engine: &mut E,
    bins: &[Bin],
    items: &[Item],
) -> Result<Packing, UnsolvableError> {
    if items.is_empty() {
        return Ok(Packing::default());
    }
    if bins.is_empty() {
        tracing::warn!(items = items.len(), "no bins to pack into");
        return Err(UnsolvableError::new(bins, items, SolutionStatus::Infeasible));
    }

    let vars = build(engine, bins, items);

    match engine.solve() {
        SolutionStatus::Optimal => {
            let packing = extract(engine, bins, items, &vars);
            tracing::info!(
                bins_used = packing.bin_count(),
                total_cost = packing.total_cost(),
                total_volume = packing.total_volume(),
                "packed {} items",
                items.len()
            );
            Ok(packing)
        }
        status => {
            tracing::warn!(%status, bins = bins.len(), items = items.len(), "no optimal packing");
            Err(UnsolvableError::new(bins, items, status))
        }
    }
}

/// Entry point for callers: packs items using a MILP backend.
///
/// Holds no per-solve state, so one packer can serve concurrent calls.
#[derive(Clone)]
pub struct BinPacker {
    solver: Arc<dyn SolverService>,
    config: SolverConfig,
}

impl BinPacker {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self {
            solver,
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    pub fn pack(&self, bins: &[Bin], items: &[Item]) -> Result<Packing, UnsolvableError> {
        let mut session = SolverSession::new(self.solver.as_ref(), "bin_packing")
            .with_config(self.config.clone());
        solve_with(&mut session, bins, items)
    }
}
