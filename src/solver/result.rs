//! Solve statuses and the values a backend hands back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::evaluation::Assignment;

/// Terminal state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal within the gap.
    Optimal,
    /// A feasible point without an optimality proof.
    Feasible,
    /// No feasible point exists.
    Infeasible,
    /// Stopped by the time or iteration limit, with or without a point.
    TimeLimit,
}

impl SolveStatus {
    /// Lower-case name used in logs and reports.
    pub fn label(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::TimeLimit => "time limit",
        }
    }

    /// Returns `true` if the status promises a variable assignment.
    pub fn requires_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status, objective and values returned by a [`Solver`](super::Solver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// How the solve ended.
    pub status: SolveStatus,
    /// Objective of the returned point, if any.
    pub objective: Option<f64>,
    /// One value per model variable, if a point was found.
    pub assignment: Option<Assignment>,
}

impl SolveResult {
    /// Proven optimum.
    pub fn optimal(assignment: Assignment, objective: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            objective: Some(objective),
            assignment: Some(assignment),
        }
    }

    /// Feasible point without proof.
    pub fn feasible(assignment: Assignment, objective: f64) -> Self {
        Self {
            status: SolveStatus::Feasible,
            objective: Some(objective),
            assignment: Some(assignment),
        }
    }

    /// No feasible point.
    pub fn infeasible() -> Self {
        Self {
            status: SolveStatus::Infeasible,
            objective: None,
            assignment: None,
        }
    }

    /// Stopped by a limit, keeping the incumbent if there is one.
    pub fn time_limit(incumbent: Option<(Assignment, f64)>) -> Self {
        let (assignment, objective) = match incumbent {
            Some((a, obj)) => (Some(a), Some(obj)),
            None => (None, None),
        };
        Self {
            status: SolveStatus::TimeLimit,
            objective,
            assignment,
        }
    }

    /// Returns `true` if a variable assignment is attached.
    pub fn has_solution(&self) -> bool {
        self.assignment.is_some()
    }

    /// Checks the result against a model with `num_variables` variables.
    pub fn check(&self, num_variables: usize) -> Result<(), SolverError> {
        match &self.assignment {
            Some(a) if a.len() != num_variables => Err(SolverError::AssignmentSize {
                expected: num_variables,
                got: a.len(),
            }),
            None if self.status.requires_solution() => Err(SolverError::MissingAssignment {
                status: self.status.label(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_size() {
        let r = SolveResult::optimal(Assignment::zeros(3), 0.0);
        assert!(r.check(3).is_ok());
        assert_eq!(
            r.check(4),
            Err(SolverError::AssignmentSize {
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn test_optimal_requires_assignment() {
        let r = SolveResult {
            status: SolveStatus::Optimal,
            objective: Some(1.0),
            assignment: None,
        };
        assert_eq!(
            r.check(3),
            Err(SolverError::MissingAssignment { status: "optimal" })
        );
    }

    #[test]
    fn test_terminal_states_without_solution() {
        assert!(SolveResult::infeasible().check(10).is_ok());
        let r = SolveResult::time_limit(None);
        assert!(r.check(10).is_ok());
        assert!(!r.has_solution());
        assert_eq!(r.status.to_string(), "time limit");
    }

    #[test]
    fn test_time_limit_keeps_incumbent() {
        let r = SolveResult::time_limit(Some((Assignment::zeros(2), 12.5)));
        assert_eq!(r.objective, Some(12.5));
        assert!(r.has_solution());
    }
}
