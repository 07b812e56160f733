//! Model evaluator that checks bounds, integrality and constraints.

use serde::Serialize;

use crate::error::SolverError;
use crate::formulation::Model;

use super::Assignment;

/// A type of violation found in an assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViolationType {
    /// Value outside the variable's declared bounds.
    BoundViolated {
        /// Variable name.
        variable: String,
        /// Offending value.
        value: f64,
        /// Declared lower bound.
        lower: f64,
        /// Declared upper bound.
        upper: f64,
    },
    /// Fractional value on a binary or integer variable.
    NotIntegral {
        /// Variable name.
        variable: String,
        /// Offending value.
        value: f64,
    },
    /// Constraint residual above tolerance.
    ConstraintViolated {
        /// Constraint family.
        family: &'static str,
        /// Constraint instance name.
        constraint: String,
        /// Amount of violation.
        residual: f64,
    },
}

/// A violation in an assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }

    /// Name of the offending constraint, if any.
    pub fn constraint(&self) -> Option<&str> {
        match &self.kind {
            ViolationType::ConstraintViolated { constraint, .. } => Some(constraint),
            _ => None,
        }
    }
}

/// Outcome of [`ModelEvaluator::evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Objective value at the assignment.
    pub objective: f64,
    /// Everything found wrong, in variable then constraint order.
    pub violations: Vec<Violation>,
}

impl Evaluation {
    /// Returns `true` if nothing was violated.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns `true` if the named constraint is among the violations.
    pub fn violates(&self, constraint: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.constraint() == Some(constraint))
    }
}

/// Checks an assignment against a model.
///
/// # Examples
///
/// ```
/// use u_milkrun::evaluation::{Assignment, ModelEvaluator};
/// use u_milkrun::formulation::{Constraint, ConstraintSet, Expr, ModelBuilder};
///
/// let mut b = ModelBuilder::new();
/// let slack = b.continuous("slack_capacity[Shinju_1]", 0.0, f64::INFINITY);
/// let mut cs = ConstraintSet::new();
/// cs.push(Constraint::le(
///     "slack_cap",
///     "slack_cap[Shinju_1]",
///     slack.into(),
///     Expr::constant(0.01 * 2513.0),
/// ));
/// let model = b.finish(cs, Expr::from(slack) * 500_000.0);
///
/// let evaluator = ModelEvaluator::new(&model);
/// let ok = evaluator.evaluate(&Assignment::from_values(vec![25.13])).unwrap();
/// assert!(ok.is_feasible());
/// let bad = evaluator.evaluate(&Assignment::from_values(vec![25.14])).unwrap();
/// assert!(bad.violates("slack_cap[Shinju_1]"));
/// ```
pub struct ModelEvaluator<'a> {
    model: &'a Model,
    tolerance: f64,
    integer_tolerance: f64,
}

impl<'a> ModelEvaluator<'a> {
    /// Creates an evaluator with tolerances `1e-6` (constraints and bounds)
    /// and `1e-4` (integrality).
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            tolerance: 1e-6,
            integer_tolerance: 1e-4,
        }
    }

    /// Sets the constraint and bound tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Sets the integrality tolerance.
    pub fn with_integer_tolerance(mut self, tol: f64) -> Self {
        self.integer_tolerance = tol;
        self
    }

    /// Evaluates the objective and collects every violation.
    ///
    /// Fails only if the assignment does not have one value per variable.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<Evaluation, SolverError> {
        let expected = self.model.num_variables();
        if assignment.len() != expected {
            return Err(SolverError::AssignmentSize {
                expected,
                got: assignment.len(),
            });
        }

        let value = |v| assignment.value(v);
        let mut violations = Vec::new();

        for (var, &x) in self.model.variables().iter().zip(assignment.values()) {
            if !var.within_bounds(x, self.tolerance) {
                violations.push(Violation::new(ViolationType::BoundViolated {
                    variable: var.name().to_string(),
                    value: x,
                    lower: var.lower(),
                    upper: var.upper(),
                }));
            }
            if !var.is_integral_value(x, self.integer_tolerance) {
                violations.push(Violation::new(ViolationType::NotIntegral {
                    variable: var.name().to_string(),
                    value: x,
                }));
            }
        }

        for c in self.model.constraints() {
            let residual = c.residual(value);
            if residual > self.tolerance {
                violations.push(Violation::new(ViolationType::ConstraintViolated {
                    family: c.family(),
                    constraint: c.name().to_string(),
                    residual,
                }));
            }
        }

        Ok(Evaluation {
            objective: self.model.objective().eval(value),
            violations,
        })
    }
}
