//! Decision variable declarations.

use serde::{Deserialize, Serialize};

/// Handle of a declared variable; the position in the model's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(usize);

impl VarId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in the model's variable list and in any assignment.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Domain of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarKind {
    /// 0 or 1.
    Binary,
    /// Integral within the bounds.
    Integer,
    /// Real within the bounds.
    Continuous,
}

impl VarKind {
    /// Returns `true` for binary and integer variables.
    pub fn is_integral(self) -> bool {
        !matches!(self, VarKind::Continuous)
    }
}

/// A named variable with explicit bounds.
///
/// Unbounded sides use `f64::INFINITY` / `f64::NEG_INFINITY`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    kind: VarKind,
    lower: f64,
    upper: f64,
}

impl Variable {
    /// Creates a variable. Binary variables always get bounds `[0, 1]`.
    pub fn new(name: impl Into<String>, kind: VarKind, lower: f64, upper: f64) -> Self {
        let (lower, upper) = match kind {
            VarKind::Binary => (0.0, 1.0),
            _ => (lower, upper),
        };
        Self {
            name: name.into(),
            kind,
            lower,
            upper,
        }
    }

    /// Variable name, unique within a model.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Domain.
    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// Lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns `true` if `value` lies within the bounds, widened by `tol`.
    pub fn within_bounds(&self, value: f64, tol: f64) -> bool {
        value >= self.lower - tol && value <= self.upper + tol
    }

    /// Returns `true` if `value` respects integrality within `tol`.
    pub fn is_integral_value(&self, value: f64, tol: f64) -> bool {
        !self.kind.is_integral() || (value - value.round()).abs() <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_bounds_forced() {
        let v = Variable::new("used[Shinju_1]", VarKind::Binary, -5.0, 9.0);
        assert_eq!(v.lower(), 0.0);
        assert_eq!(v.upper(), 1.0);
    }

    #[test]
    fn test_within_bounds() {
        let v = Variable::new("tank[Sorong]", VarKind::Continuous, 1689.59, 3195.64);
        assert!(v.within_bounds(1689.59, 0.0));
        assert!(v.within_bounds(1689.58, 0.1));
        assert!(!v.within_bounds(3200.0, 1e-6));
    }

    #[test]
    fn test_integrality() {
        let y = Variable::new("y", VarKind::Integer, 0.0, 10.0);
        assert!(y.is_integral_value(2.00001, 1e-4));
        assert!(!y.is_integral_value(2.5, 1e-4));
        let c = Variable::new("c", VarKind::Continuous, 0.0, 10.0);
        assert!(c.is_integral_value(2.5, 1e-4));
    }
}
