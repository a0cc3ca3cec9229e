// Domain value objects shared by the packing model and the solver backends

use std::fmt;

/// Handle to a decision variable registered with a solver engine.
///
/// Handles are dense indices in creation order, so a backend can store
/// variables in a `Vec` and look them up directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableHandle(usize);

impl VariableHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VariableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Relation between a linear expression and a constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintType::LessThanOrEqual => write!(f, "<="),
            ConstraintType::Equal => write!(f, "="),
            ConstraintType::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// Terminal status of a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Found optimal solution
    Optimal,
    /// Found feasible solution (may not be optimal)
    Feasible,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Time limit reached
    TimeLimit,
    /// Iteration limit reached
    IterationLimit,
    /// Solver error occurred
    Error,
}

impl SolutionStatus {
    pub fn is_optimal(self) -> bool {
        self == SolutionStatus::Optimal
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Feasible => write!(f, "Feasible"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::TimeLimit => write!(f, "Time Limit Reached"),
            SolutionStatus::IterationLimit => write!(f, "Iteration Limit Reached"),
            SolutionStatus::Error => write!(f, "Error"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverBackend {
    /// Automatically select best solver
    #[default]
    Auto,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl std::str::FromStr for SolverBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SolverBackend::Auto),
            "cbc" | "coin_cbc" | "coin-cbc" => Ok(SolverBackend::CoinCbc),
            "highs" => Ok(SolverBackend::Highs),
            other => Err(format!("unknown solver backend '{}'", other)),
        }
    }
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("auto".parse::<SolverBackend>(), Ok(SolverBackend::Auto));
        assert_eq!(" CBC ".parse::<SolverBackend>(), Ok(SolverBackend::CoinCbc));
        assert_eq!("highs".parse::<SolverBackend>(), Ok(SolverBackend::Highs));
        assert!("gurobi".parse::<SolverBackend>().is_err());
    }

    #[test]
    fn test_only_optimal_is_optimal() {
        assert!(SolutionStatus::Optimal.is_optimal());
        assert!(!SolutionStatus::Feasible.is_optimal());
        assert!(!SolutionStatus::TimeLimit.is_optimal());
    }
}
