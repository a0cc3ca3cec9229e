use crate::domain::{Bin, ConstraintType, Item, LinearExpression, SolverEngine, VariableHandle};

/// Decision variables of one bin packing model.
///
/// Indexed by input position, not by id, so lookups stay stable even when
/// two records share a display name.
#[derive(Debug, Clone)]
pub struct ModelVariables {
    /// `assignment[item][bin]` is 1 iff the item is packed into the bin
    pub assignment: Vec<Vec<VariableHandle>>,
    /// `usage[bin]` is 1 iff the bin is used at all
    pub usage: Vec<VariableHandle>,
}

impl ModelVariables {
    pub fn assignment(&self, item: usize, bin: usize) -> VariableHandle {
        self.assignment[item][bin]
    }

    pub fn usage(&self, bin: usize) -> VariableHandle {
        self.usage[bin]
    }
}

/// Weight on every used bin. It is at least as large as any single bin's
/// cost or capacity, so saving a bin outweighs most cost/volume trade-offs.
pub fn count_penalty(bins: &[Bin]) -> u64 {
    let max_cost = bins.iter().map(|bin| bin.cost).max().unwrap_or(0);
    let max_capacity = bins.iter().map(|bin| bin.volume_capacity).max().unwrap_or(0);
    max_cost.max(max_capacity)
}

/// Populate `engine` with the bin packing model for `bins` and `items`.
pub fn build<E: SolverEngine + ?Sized>(
    engine: &mut E,
    bins: &[Bin],
    items: &[Item],
) -> ModelVariables {
    let assignment: Vec<Vec<VariableHandle>> = items
        .iter()
        .map(|item| {
            bins.iter()
                .map(|bin| engine.new_integer_variable(0, 1, &format!("{} in {}", item.id, bin.id)))
                .collect()
        })
        .collect();

    let usage: Vec<VariableHandle> = bins
        .iter()
        .map(|bin| engine.new_integer_variable(0, 1, &bin.id))
        .collect();

    // Each item goes into exactly one bin
    for row in &assignment {
        let placed: LinearExpression = row.iter().map(|&var| var * 1u64).sum();
        engine.add_constraint(placed, ConstraintType::Equal, 1.0);
    }

    // Packed volume <= capacity * usage, so an unused bin holds nothing
    for (b, bin) in bins.iter().enumerate() {
        let mut load: LinearExpression = items
            .iter()
            .zip(&assignment)
            .map(|(item, row)| row[b] * item.volume)
            .sum();
        load.add_term(usage[b], -(bin.volume_capacity as f64));
        engine.add_constraint(load, ConstraintType::LessThanOrEqual, 0.0);
    }

    let penalty = count_penalty(bins);
    let count: LinearExpression = usage.iter().map(|&var| var * penalty).sum();
    let cost: LinearExpression = bins.iter().zip(&usage).map(|(bin, &var)| var * bin.cost).sum();
    let volume: LinearExpression = bins
        .iter()
        .zip(&usage)
        .map(|(bin, &var)| var * bin.volume_capacity)
        .sum();
    engine.minimize(count + cost + volume);

    tracing::debug!(
        bins = bins.len(),
        items = items.len(),
        count_penalty = penalty,
        "built bin packing model"
    );

    ModelVariables { assignment, usage }
}
