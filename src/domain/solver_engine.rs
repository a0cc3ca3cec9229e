// Incremental solver interface consumed by the packing core

use std::time::Instant;

use super::models::{
    Constraint, LinearExpression, ObjectiveFunction, OptimizationProblem, Solution, SolverConfig,
    SolverStatistics, Variable,
};
use super::solver_service::SolverService;
use super::value_objects::{ConstraintType, SolutionStatus, VariableHandle};

/// Capability interface of a MILP engine: create variables, register linear
/// constraints, set a minimization objective, solve, read values back.
///
/// One engine instance models exactly one problem; callers create a fresh
/// engine per solve.
pub trait SolverEngine {
    fn new_integer_variable(&mut self, lower: i64, upper: i64, name: &str) -> VariableHandle;

    fn add_constraint(
        &mut self,
        expression: LinearExpression,
        relation: ConstraintType,
        constant: f64,
    );

    fn minimize(&mut self, expression: LinearExpression);

    /// Blocks until the backend reaches a terminal status.
    fn solve(&mut self) -> SolutionStatus;

    /// Solved value of `variable`, or `0.0` when no values are available.
    fn solution_value(&self, variable: VariableHandle) -> f64;
}

/// [`SolverEngine`] that records the model into an [`OptimizationProblem`]
/// and hands it to a [`SolverService`] backend on `solve`.
pub struct SolverSession<'a> {
    backend: &'a dyn SolverService,
    problem: OptimizationProblem,
    solution: Option<Solution>,
}

impl<'a> SolverSession<'a> {
    pub fn new(backend: &'a dyn SolverService, name: impl Into<String>) -> Self {
        Self {
            backend,
            problem: OptimizationProblem::new(name),
            solution: None,
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.problem.solver_config = config;
        self
    }

    pub fn problem(&self) -> &OptimizationProblem {
        &self.problem
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }
}

impl SolverEngine for SolverSession<'_> {
    fn new_integer_variable(&mut self, lower: i64, upper: i64, name: &str) -> VariableHandle {
        self.problem.add_variable(Variable::integer(name, lower, upper))
    }

    fn add_constraint(
        &mut self,
        expression: LinearExpression,
        relation: ConstraintType,
        constant: f64,
    ) {
        let name = format!("c{}", self.problem.num_constraints());
        self.problem
            .add_constraint(Constraint::new(relation, expression, constant).with_name(name));
    }

    fn minimize(&mut self, expression: LinearExpression) {
        self.problem
            .set_objective(ObjectiveFunction::minimize(expression));
    }

    fn solve(&mut self) -> SolutionStatus {
        tracing::debug!(
            problem = %self.problem.name,
            backend = self.backend.name(),
            variables = self.problem.num_variables(),
            constraints = self.problem.num_constraints(),
            "solving model"
        );

        let start = Instant::now();
        let solution = match self.backend.solve(&self.problem) {
            Ok(solution) => solution,
            Err(err) => {
                tracing::error!(
                    problem = %self.problem.name,
                    backend = self.backend.name(),
                    error = %err,
                    "solver backend failed"
                );
                let elapsed = start.elapsed().as_secs_f64() * 1000.0;
                Solution::new(SolutionStatus::Error, err.to_string())
                    .with_statistics(SolverStatistics::for_problem(&self.problem, elapsed))
            }
        };

        tracing::debug!(
            status = %solution.status,
            objective = ?solution.optimal_value,
            solve_time_ms = solution.statistics.solve_time_ms,
            "{}",
            solution.message
        );

        let status = solution.status;
        self.solution = Some(solution);
        status
    }

    fn solution_value(&self, variable: VariableHandle) -> f64 {
        match &self.solution {
            Some(solution) if solution.is_optimal() => solution.value(variable),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::solver_service::{Result, SolverError};

    struct Canned(Option<Vec<f64>>);

    impl SolverService for Canned {
        fn solve(&self, _problem: &OptimizationProblem) -> Result<Solution> {
            match &self.0 {
                Some(values) => Ok(Solution::optimal(0.0, values.clone())),
                None => Err(SolverError::ExecutionFailed("boom".to_string())),
            }
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    #[test]
    fn test_session_records_model() {
        let backend = Canned(Some(vec![1.0, 0.0]));
        let mut session = SolverSession::new(&backend, "record");

        let x = session.new_integer_variable(0, 1, "x");
        let y = session.new_integer_variable(0, 1, "y");
        session.add_constraint(x * 1u64 + y * 1u64, ConstraintType::Equal, 1.0);
        session.minimize(x * 2u64 + y * 3u64);

        let problem = session.problem();
        assert_eq!(problem.num_variables(), 2);
        assert_eq!(problem.constraints[0].name, "c0");
        assert_eq!(problem.objective.expression.coefficient(y), 3.0);
    }

    #[test]
    fn test_values_are_readable_after_optimal_solve() {
        let backend = Canned(Some(vec![1.0, 0.0]));
        let mut session = SolverSession::new(&backend, "values");
        let x = session.new_integer_variable(0, 1, "x");
        let y = session.new_integer_variable(0, 1, "y");

        assert_eq!(session.solution_value(x), 0.0);
        assert_eq!(session.solve(), SolutionStatus::Optimal);
        assert_eq!(session.solution_value(x), 1.0);
        assert_eq!(session.solution_value(y), 0.0);
    }

    #[test]
    fn test_backend_failure_becomes_error_status() {
        let backend = Canned(None);
        let mut session = SolverSession::new(&backend, "failing");
        let x = session.new_integer_variable(0, 1, "x");

        assert_eq!(session.solve(), SolutionStatus::Error);
        assert_eq!(session.solution_value(x), 0.0);
        assert!(session.solution().unwrap().message.contains("boom"));
    }
}
