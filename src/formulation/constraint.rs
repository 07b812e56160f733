//! Named constraints.

use serde::{Deserialize, Serialize};

use super::{Expr, VarId};

/// Relation between a constraint's left-hand side and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sense {
    /// `lhs ≤ rhs`
    Le,
    /// `lhs ≥ rhs`
    Ge,
    /// `lhs = rhs`
    Eq,
}

/// A named constraint `expr (≤|≥|=) rhs`.
///
/// The constant part of both sides is folded into `rhs`, so `expr` only
/// holds variable terms. `family` groups constraints generated by the same
/// rule (e.g. `"plant_flow"`); `name` identifies one instance
/// (e.g. `"plant_flow[Ambon,Shinju_1]"`).
///
/// # Examples
///
/// ```
/// use u_milkrun::formulation::{Constraint, Expr, ModelBuilder};
///
/// let mut b = ModelBuilder::new();
/// let slack = b.continuous("slack", 0.0, f64::INFINITY);
/// // slack ≤ 0.01 · 2513
/// let c = Constraint::le("slack_cap", "slack_cap[Shinju_1]", slack.into(), Expr::constant(25.13));
/// assert!(c.is_satisfied(|_| 25.13, 1e-9));
/// assert!(!c.is_satisfied(|_| 25.14, 1e-9));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    family: &'static str,
    name: String,
    expr: Expr,
    sense: Sense,
    rhs: f64,
}

impl Constraint {
    /// Builds `lhs (sense) rhs` from two arbitrary expressions.
    pub fn new(
        family: &'static str,
        name: impl Into<String>,
        lhs: Expr,
        sense: Sense,
        rhs: Expr,
    ) -> Self {
        let diff = lhs - rhs;
        let bound = -diff.constant_value();
        Self {
            family,
            name: name.into(),
            expr: diff.without_constant(),
            sense,
            rhs: bound,
        }
    }

    /// `lhs ≤ rhs`.
    pub fn le(family: &'static str, name: impl Into<String>, lhs: Expr, rhs: Expr) -> Self {
        Self::new(family, name, lhs, Sense::Le, rhs)
    }

    /// `lhs ≥ rhs`.
    pub fn ge(family: &'static str, name: impl Into<String>, lhs: Expr, rhs: Expr) -> Self {
        Self::new(family, name, lhs, Sense::Ge, rhs)
    }

    /// `lhs = rhs`.
    pub fn eq(family: &'static str, name: impl Into<String>, lhs: Expr, rhs: Expr) -> Self {
        Self::new(family, name, lhs, Sense::Eq, rhs)
    }

    /// Rule that generated this constraint.
    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variable part of the left-hand side.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Relation.
    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Constant right-hand side.
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Returns `true` if the constraint contains a bilinear term.
    pub fn is_nonlinear(&self) -> bool {
        !self.expr.is_linear()
    }

    /// Value of the left-hand side.
    pub fn activity(&self, value: impl Fn(VarId) -> f64) -> f64 {
        self.expr.eval(value)
    }

    /// Amount by which the constraint is violated; zero when satisfied.
    pub fn residual(&self, value: impl Fn(VarId) -> f64) -> f64 {
        let activity = self.activity(value);
        match self.sense {
            Sense::Le => (activity - self.rhs).max(0.0),
            Sense::Ge => (self.rhs - activity).max(0.0),
            Sense::Eq => (activity - self.rhs).abs(),
        }
    }

    /// Returns `true` if the residual is within `tol`.
    pub fn is_satisfied(&self, value: impl Fn(VarId) -> f64, tol: f64) -> bool {
        self.residual(value) <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_folding() {
        let x = VarId::new(0);
        // x + 3 ≤ 10 - 2x  =>  3x ≤ 7
        let c = Constraint::le("f", "f[0]", Expr::from(x) + 3.0, Expr::constant(10.0) - x * 2.0);
        assert_eq!(c.rhs(), 7.0);
        assert_eq!(c.activity(|_| 1.0), 3.0);
        assert_eq!(c.expr().constant_value(), 0.0);
    }

    #[test]
    fn test_residuals() {
        let x = VarId::new(0);
        let le = Constraint::le("f", "le", x.into(), Expr::constant(5.0));
        let ge = Constraint::ge("f", "ge", x.into(), Expr::constant(5.0));
        let eq = Constraint::eq("f", "eq", x.into(), Expr::constant(5.0));
        assert_eq!(le.residual(|_| 7.0), 2.0);
        assert_eq!(le.residual(|_| 3.0), 0.0);
        assert_eq!(ge.residual(|_| 3.0), 2.0);
        assert_eq!(ge.residual(|_| 7.0), 0.0);
        assert_eq!(eq.residual(|_| 3.0), 2.0);
        assert_eq!(eq.residual(|_| 7.0), 2.0);
    }

    #[test]
    fn test_nonlinear_flag() {
        let (a, b) = (VarId::new(0), VarId::new(1));
        let c = Constraint::eq("f", "p", Expr::product(a, b, 1.0), Expr::zero());
        assert!(c.is_nonlinear());
        assert_eq!(c.family(), "f");
        assert_eq!(c.name(), "p");
    }
}
