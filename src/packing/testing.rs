// Scripted backend for unit tests: sets variables to 1 by name

use std::collections::HashSet;
use std::sync::Mutex;

use crate::domain::{
    OptimizationProblem, Result, Solution, SolutionStatus, SolverService, SolverStatistics,
};

#[derive(Default)]
pub struct ScriptedSolver {
    ones: HashSet<String>,
    status: Option<SolutionStatus>,
    noise: f64,
    solved: Mutex<Vec<OptimizationProblem>>,
}

impl ScriptedSolver {
    /// Optimal solution placing each `(item, bin)` pair and marking `used` bins
    pub fn assigning(placements: &[(&str, &str)], used: &[&str]) -> Self {
        let ones = placements
            .iter()
            .map(|(item, bin)| format!("{} in {}", item, bin))
            .chain(used.iter().map(|bin| bin.to_string()))
            .collect();
        Self {
            ones,
            ..Self::default()
        }
    }

    /// Terminal status other than optimal, with no values
    pub fn failing(status: SolutionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn solve_count(&self) -> usize {
        self.solved.lock().map(|solved| solved.len()).unwrap_or(0)
    }

    pub fn last_problem(&self) -> Option<OptimizationProblem> {
        self.solved.lock().ok().and_then(|solved| solved.last().cloned())
    }
}

impl SolverService for ScriptedSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
        if let Ok(mut solved) = self.solved.lock() {
            solved.push(problem.clone());
        }

        let statistics = SolverStatistics::for_problem(problem, 0.0);
        if let Some(status) = self.status {
            return Ok(Solution::new(status, "scripted").with_statistics(statistics));
        }

        let values: Vec<f64> = problem
            .variables
            .iter()
            .map(|var| {
                if self.ones.contains(&var.name) {
                    1.0 - self.noise
                } else {
                    self.noise
                }
            })
            .collect();
        let objective = problem.objective.expression.evaluate(&values);
        Ok(Solution::optimal(objective, values).with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
