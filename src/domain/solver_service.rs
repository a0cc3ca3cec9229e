// Domain service interface for solving a fully built optimization problem
// Backends implement this; the packing core talks to them through a SolverEngine

use super::models::{OptimizationProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for MILP backends
///
/// Infeasible and unbounded models are not errors: they come back as a
/// [`Solution`] with the matching status. `Err` is reserved for models the
/// backend cannot accept and for failures inside the backend itself.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = problem.num_variables();

        for (i, var) in problem.variables.iter().enumerate() {
            if var.lower_bound > var.upper_bound {
                errors.push(format!(
                    "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                    i, var.name, var.lower_bound, var.upper_bound
                ));
            }
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            if !constraint.bound.is_finite() {
                errors.push(format!("Constraint {} has a non-finite bound", i));
            }
            for (variable, coefficient) in constraint.expression.terms() {
                if variable.index() >= num_vars {
                    errors.push(format!(
                        "Constraint {} references undeclared variable {}",
                        i, variable
                    ));
                }
                if !coefficient.is_finite() {
                    errors.push(format!(
                        "Constraint {} has a non-finite coefficient on {}",
                        i, variable
                    ));
                }
            }
        }

        for (variable, coefficient) in problem.objective.expression.terms() {
            if variable.index() >= num_vars {
                errors.push(format!("Objective references undeclared variable {}", variable));
            }
            if !coefficient.is_finite() {
                errors.push(format!("Objective has a non-finite coefficient on {}", variable));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}
