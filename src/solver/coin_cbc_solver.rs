// COIN-OR CBC Solver Adapter
// Implements the SolverService interface for CBC through good_lp

use crate::domain::{
    models::{LinearExpression, OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, SolutionStatus as DomainSolutionStatus},
};
use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

fn to_good_lp(expression: &LinearExpression, lp_variables: &[GoodLpVariable]) -> Expression {
    let mut expr: Expression = 0.into();
    for (var, coeff) in expression.terms() {
        if coeff != 0.0 {
            expr += coeff * lp_variables[var.index()];
        }
    }
    expr
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        // Validate first
        self.validate(problem)?;

        if problem.solver_config.time_limit.is_some() {
            tracing::warn!("time limit is not supported by the CBC adapter; solving to optimality");
        }

        let start_time = Instant::now();

        // Build variables using good_lp
        let mut vars = variables!();
        let lp_variables: Vec<GoodLpVariable> = problem
            .variables
            .iter()
            .map(|var_def| {
                vars.add(
                    variable()
                        .integer()
                        .min(var_def.lower_bound)
                        .max(var_def.upper_bound)
                        .name(var_def.name.clone()),
                )
            })
            .collect();

        let objective = to_good_lp(&problem.objective.expression, &lp_variables);
        let mut lp_model = vars.minimise(objective).using(coin_cbc::coin_cbc);
        lp_model.set_parameter("log", "0");

        for constraint in &problem.constraints {
            let lhs = to_good_lp(&constraint.expression, &lp_variables);

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    lp_model = lp_model.with(lhs.leq(constraint.bound));
                }
                ConstraintType::Equal => {
                    lp_model = lp_model.with(lhs.eq(constraint.bound));
                }
                ConstraintType::GreaterThanOrEqual => {
                    lp_model = lp_model.with(lhs.geq(constraint.bound));
                }
            }
        }

        // Solve the problem
        let solution_result = lp_model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = SolverStatistics::for_problem(problem, solve_time);

        // Process result
        match solution_result {
            Ok(sol) => {
                let variable_values: Vec<f64> =
                    lp_variables.iter().map(|&var| sol.value(var)).collect();
                let actual_obj = problem.objective.expression.evaluate(&variable_values);

                let mut solution = DomainSolution::optimal(actual_obj, variable_values);
                solution.statistics = statistics;
                solution.message = format!("Optimal solution found for '{}'", problem.name);

                Ok(solution)
            }
            Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
                DomainSolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_statistics(statistics)),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}
