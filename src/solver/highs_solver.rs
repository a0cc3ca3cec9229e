// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// This is an adapter pattern - translates our domain models to HiGHS API

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, SolutionStatus as DomainSolutionStatus, VariableHandle},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();

        // Use HiGHS RowProblem (add variables first, then constraints)
        let mut pb = RowProblem::default();

        // Objective coefficients live on the columns
        let vars: Vec<_> = problem
            .variables
            .iter()
            .enumerate()
            .map(|(i, var_def)| {
                let obj_coeff = problem.objective.expression.coefficient(VariableHandle::new(i));
                pb.add_integer_column(obj_coeff, var_def.lower_bound..=var_def.upper_bound)
            })
            .collect();

        // Add constraints
        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .expression
                .terms()
                .filter(|&(_, coeff)| coeff != 0.0)
                .map(|(var, coeff)| (vars[var.index()], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let mut model = pb.optimise(Sense::Minimise);
        model.set_option("output_flag", false);
        if let Some(seconds) = problem.solver_config.time_limit {
            model.set_option("time_limit", seconds);
        }

        let solved = model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = SolverStatistics::for_problem(problem, solve_time);

        // Process result
        match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let actual_obj = problem.objective.expression.evaluate(&variable_values);

                let mut solution = DomainSolution::optimal(actual_obj, variable_values);
                solution.statistics = statistics;
                solution.message = format!("Optimal solution found for '{}'", problem.name);

                Ok(solution)
            }
            // Every column has finite bounds, so "unbounded or infeasible" can only be infeasible
            HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
                Ok(DomainSolution::new(
                    DomainSolutionStatus::Infeasible,
                    "Problem is infeasible: no solution satisfies all constraints",
                )
                .with_statistics(statistics))
            }
            HighsModelStatus::Unbounded => {
                Ok(DomainSolution::new(
                    DomainSolutionStatus::Unbounded,
                    "Problem is unbounded: objective can be improved infinitely",
                )
                .with_statistics(statistics))
            }
            HighsModelStatus::ReachedTimeLimit => Ok(DomainSolution::new(
                DomainSolutionStatus::TimeLimit,
                "Time limit reached before optimality was proven",
            )
            .with_statistics(statistics)),
            HighsModelStatus::ReachedIterationLimit => Ok(DomainSolution::new(
                DomainSolutionStatus::IterationLimit,
                "Iteration limit reached before optimality was proven",
            )
            .with_statistics(statistics)),
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
