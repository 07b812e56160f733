//! Big-M conditional constraints driven by a routing mode.
//!
//! A ship's `single_visit_allowed` binary selects between two routing modes.
//! Each conditional rule states the inequality that must hold in one mode;
//! the relaxation term that switches it off in the other mode is derived
//! from the mode.

use serde::{Deserialize, Serialize};

use super::{Constraint, Expr, VarId};

/// Routing regime of a ship, encoded by its split indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutingMode {
    /// Indicator 0: the ship must run a multi-plant trip.
    MilkRun,
    /// Indicator 1: the ship may serve a single plant.
    Split,
}

impl RoutingMode {
    /// Indicator value that selects this mode.
    pub fn indicator_value(self) -> f64 {
        match self {
            RoutingMode::MilkRun => 0.0,
            RoutingMode::Split => 1.0,
        }
    }

    /// Reads the mode from a solved indicator value.
    pub fn from_indicator(value: f64, threshold: f64) -> Self {
        if value > threshold {
            RoutingMode::Split
        } else {
            RoutingMode::MilkRun
        }
    }

    /// Expression that is 0 in this mode and 1 in the other.
    fn relaxation(self, indicator: VarId) -> Expr {
        match self {
            RoutingMode::MilkRun => Expr::from(indicator),
            RoutingMode::Split => Expr::constant(1.0) - indicator,
        }
    }
}

/// Direction of a conditional inequality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bound {
    /// `lhs ≤ rhs` while active.
    AtMost,
    /// `lhs ≥ rhs` while active.
    AtLeast,
}

/// An inequality that binds only in one [`RoutingMode`].
///
/// Lowered with a Big-M constant `M` into
/// `lhs ≤ rhs + M·r` or `lhs ≥ rhs − M·r`, where `r` is the indicator for
/// [`RoutingMode::MilkRun`] and `1 − indicator` for [`RoutingMode::Split`].
///
/// # Examples
///
/// ```
/// use u_milkrun::formulation::{Bound, ConditionalRule, Expr, ModelBuilder, RoutingMode, VarId};
///
/// let mut b = ModelBuilder::new();
/// let sv = b.binary("single_visit");
/// let delivered = b.continuous("delivered", 0.0, f64::INFINITY);
///
/// // delivered ≤ 1.05·2513 unless the ship is allowed to split
/// let rule = ConditionalRule::new(
///     "band_upper",
///     "band_upper[Shinju_1]",
///     delivered.into(),
///     Bound::AtMost,
///     Expr::constant(1.05 * 2513.0),
///     sv,
///     RoutingMode::MilkRun,
/// );
/// let c = rule.lower(50_000.0);
/// let values = |split: f64| move |v: VarId| if v == sv { split } else { 3000.0 };
/// assert!(!c.is_satisfied(values(0.0), 1e-6));
/// assert!(c.is_satisfied(values(1.0), 1e-6));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalRule {
    family: &'static str,
    name: String,
    lhs: Expr,
    bound: Bound,
    rhs: Expr,
    indicator: VarId,
    active_in: RoutingMode,
}

impl ConditionalRule {
    /// Creates a rule that binds while the indicator selects `active_in`.
    pub fn new(
        family: &'static str,
        name: impl Into<String>,
        lhs: Expr,
        bound: Bound,
        rhs: Expr,
        indicator: VarId,
        active_in: RoutingMode,
    ) -> Self {
        Self {
            family,
            name: name.into(),
            lhs,
            bound,
            rhs,
            indicator,
            active_in,
        }
    }

    /// Mode in which the rule binds.
    pub fn active_in(&self) -> RoutingMode {
        self.active_in
    }

    /// Indicator variable.
    pub fn indicator(&self) -> VarId {
        self.indicator
    }

    /// Lowers the rule into a plain constraint using `big_m`.
    pub fn lower(self, big_m: f64) -> Constraint {
        let relax = self.active_in.relaxation(self.indicator) * big_m;
        match self.bound {
            Bound::AtMost => Constraint::le(self.family, self.name, self.lhs, self.rhs + relax),
            Bound::AtLeast => Constraint::ge(self.family, self.name, self.lhs, self.rhs - relax),
        }
    }
}
