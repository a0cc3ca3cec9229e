use crate::domain::{Bin, Item, PackedBin, Packing, SolverEngine, VariableHandle};

use super::builder::ModelVariables;

/// MILP backends report binaries as floats (`0.9999999`, `1e-10`).
fn is_set<E: SolverEngine + ?Sized>(engine: &E, variable: VariableHandle) -> bool {
    engine.solution_value(variable).round() != 0.0
}

/// Read the solved model back into bins and the items packed into them.
///
/// Only call after the engine reported an optimal status. A bin marked used
/// with no items assigned is kept, with an empty item list. Assignment values
/// are rounded the same way as usage values, so `0.6` counts as packed.
pub fn extract<E: SolverEngine + ?Sized>(
    engine: &E,
    bins: &[Bin],
    items: &[Item],
    vars: &ModelVariables,
) -> Packing {
    let packed = bins
        .iter()
        .enumerate()
        .filter(|&(b, _)| is_set(engine, vars.usage(b)))
        .map(|(b, bin)| PackedBin {
            bin: bin.clone(),
            items: items
                .iter()
                .enumerate()
                .filter(|&(i, _)| is_set(engine, vars.assignment(i, b)))
                .map(|(_, item)| item.clone())
                .collect(),
        })
        .collect();

    Packing::new(packed)
}
