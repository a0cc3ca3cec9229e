use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use super::value_objects::{ConstraintType, SolutionStatus, SolverBackend, VariableHandle};

/// Integer decision variable in an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub name: String,
}

impl Variable {
    pub fn integer(name: impl Into<String>, lower_bound: i64, upper_bound: i64) -> Self {
        Self {
            lower_bound: lower_bound as f64,
            upper_bound: upper_bound as f64,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self::integer(name, 0, 1)
    }

    pub fn is_binary(&self) -> bool {
        self.lower_bound == 0.0 && self.upper_bound == 1.0
    }
}

/// Sum of `coefficient * variable` terms.
///
/// Terms on the same variable are merged, so every variable appears at most
/// once. Backends such as HiGHS reject rows with duplicate columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpression {
    terms: BTreeMap<VariableHandle, f64>,
}

impl LinearExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_term(&mut self, variable: VariableHandle, coefficient: f64) {
        *self.terms.entry(variable).or_insert(0.0) += coefficient;
    }

    pub fn with_term(mut self, variable: VariableHandle, coefficient: f64) -> Self {
        self.add_term(variable, coefficient);
        self
    }

    /// Terms in variable creation order
    pub fn terms(&self) -> impl Iterator<Item = (VariableHandle, f64)> + '_ {
        self.terms.iter().map(|(&variable, &coefficient)| (variable, coefficient))
    }

    pub fn coefficient(&self, variable: VariableHandle) -> f64 {
        self.terms.get(&variable).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate against dense variable values; missing values count as zero.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms()
            .map(|(variable, coefficient)| {
                coefficient * values.get(variable.index()).copied().unwrap_or(0.0)
            })
            .sum()
    }
}

impl Mul<f64> for VariableHandle {
    type Output = LinearExpression;

    fn mul(self, coefficient: f64) -> LinearExpression {
        LinearExpression::new().with_term(self, coefficient)
    }
}

impl Mul<u64> for VariableHandle {
    type Output = LinearExpression;

    fn mul(self, coefficient: u64) -> LinearExpression {
        self * coefficient as f64
    }
}

impl Mul<i64> for VariableHandle {
    type Output = LinearExpression;

    fn mul(self, coefficient: i64) -> LinearExpression {
        self * coefficient as f64
    }
}

impl AddAssign for LinearExpression {
    fn add_assign(&mut self, rhs: LinearExpression) {
        for (variable, coefficient) in rhs.terms {
            self.add_term(variable, coefficient);
        }
    }
}

impl Add for LinearExpression {
    type Output = LinearExpression;

    fn add(mut self, rhs: LinearExpression) -> LinearExpression {
        self += rhs;
        self
    }
}

impl Sum for LinearExpression {
    fn sum<I: Iterator<Item = LinearExpression>>(iter: I) -> Self {
        iter.fold(LinearExpression::new(), Add::add)
    }
}

/// Linear constraint `expression <relation> bound`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub expression: LinearExpression,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, expression: LinearExpression, bound: f64) -> Self {
        Self {
            constraint_type,
            expression,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expression.evaluate(values);
        match self.constraint_type {
            ConstraintType::LessThanOrEqual => lhs <= self.bound + tolerance,
            ConstraintType::Equal => (lhs - self.bound).abs() <= tolerance,
            ConstraintType::GreaterThanOrEqual => lhs >= self.bound - tolerance,
        }
    }
}

/// Objective function; always minimized
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectiveFunction {
    pub expression: LinearExpression,
}

impl ObjectiveFunction {
    pub fn minimize(expression: LinearExpression) -> Self {
        Self { expression }
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Seconds; only honoured by backends that support it
    pub time_limit: Option<f64>,
}

impl SolverConfig {
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_time_limit(mut self, seconds: Option<f64>) -> Self {
        self.time_limit = seconds.filter(|s| *s > 0.0);
        self
    }
}

/// MILP model accumulated variable by variable and constraint by constraint
#[derive(Debug, Clone, Default)]
pub struct OptimizationProblem {
    pub name: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_variable(&mut self, variable: Variable) -> VariableHandle {
        self.variables.push(variable);
        VariableHandle::new(self.variables.len() - 1)
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn set_objective(&mut self, objective: ObjectiveFunction) {
        self.objective = objective;
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_binary_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_binary()).count()
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
    pub num_binary_vars: u32,
}

impl SolverStatistics {
    pub fn for_problem(problem: &OptimizationProblem, solve_time_ms: f64) -> Self {
        Self {
            solve_time_ms,
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.num_constraints() as u32,
            num_integer_vars: problem.num_variables() as u32,
            num_binary_vars: problem.num_binary_variables() as u32,
        }
    }
}

/// Raw result of solving an [`OptimizationProblem`]
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub optimal_value: Option<f64>,
    /// Dense, indexed by [`VariableHandle::index`]
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            optimal_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            optimal_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    pub fn value(&self, variable: VariableHandle) -> f64 {
        self.variable_values
            .get(variable.index())
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_on_same_variable_are_merged() {
        let x = VariableHandle::new(0);
        let y = VariableHandle::new(1);

        let expr = x * 3u64 + y * 2u64 + x * 4u64;

        assert_eq!(expr.len(), 2);
        assert_eq!(expr.coefficient(x), 7.0);
        assert_eq!(expr.coefficient(y), 2.0);
    }

    #[test]
    fn test_sum_and_evaluate() {
        let vars: Vec<_> = (0..3).map(VariableHandle::new).collect();
        let expr: LinearExpression = vars.iter().map(|&v| v * 2i64).sum();

        assert_eq!(expr.evaluate(&[1.0, 0.0, 1.0]), 4.0);
        // Short value vectors read as zero
        assert_eq!(expr.evaluate(&[1.0]), 2.0);
    }

    #[test]
    fn test_constraint_satisfaction() {
        let x = VariableHandle::new(0);
        let y = VariableHandle::new(1);
        let le = Constraint::new(ConstraintType::LessThanOrEqual, x * 6u64 + y * 4u64, 10.0);
        let eq = Constraint::new(ConstraintType::Equal, x * 1u64 + y * 1u64, 1.0);

        assert!(le.is_satisfied_by(&[1.0, 1.0], 1e-9));
        assert!(!eq.is_satisfied_by(&[1.0, 1.0], 1e-9));
        assert!(eq.is_satisfied_by(&[0.0, 1.0], 1e-9));
    }

    #[test]
    fn test_problem_hands_out_dense_handles() {
        let mut problem = OptimizationProblem::new("test");
        let a = problem.add_variable(Variable::binary("a"));
        let b = problem.add_variable(Variable::integer("b", 0, 5));

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(problem.num_variables(), 2);
        assert_eq!(problem.num_binary_variables(), 1);
    }

    #[test]
    fn test_time_limit_ignores_non_positive() {
        let config = SolverConfig::default().with_time_limit(Some(0.0));
        assert_eq!(config.time_limit, None);

        let config = SolverConfig::default().with_time_limit(Some(2.5));
        assert_eq!(config.time_limit, Some(2.5));
    }
}
