//! Variable registry, constraint set and the assembled model.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{ConditionalRule, Constraint, Expr, VarId, VarKind, Variable};

/// Owns variable declarations while a model is being built.
///
/// # Examples
///
/// ```
/// use u_milkrun::formulation::{ConstraintSet, Constraint, Expr, ModelBuilder};
///
/// let mut b = ModelBuilder::new();
/// let x = b.integer("y[Donggi,Shinju_1]", 0.0, 5.0);
/// let mut cs = ConstraintSet::new();
/// cs.push(Constraint::le("cap", "cap[0]", x.into(), Expr::constant(5.0)));
/// let model = b.finish(cs, Expr::from(x));
/// assert_eq!(model.num_variables(), 1);
/// assert_eq!(model.num_constraints(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    variables: Vec<Variable>,
}

impl ModelBuilder {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a variable and returns its handle.
    pub fn add(&mut self, name: impl Into<String>, kind: VarKind, lower: f64, upper: f64) -> VarId {
        let id = VarId::new(self.variables.len());
        self.variables.push(Variable::new(name, kind, lower, upper));
        id
    }

    /// Declares a binary variable.
    pub fn binary(&mut self, name: impl Into<String>) -> VarId {
        self.add(name, VarKind::Binary, 0.0, 1.0)
    }

    /// Declares an integer variable.
    pub fn integer(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.add(name, VarKind::Integer, lower, upper)
    }

    /// Declares a continuous variable.
    pub fn continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.add(name, VarKind::Continuous, lower, upper)
    }

    /// Looks up a declared variable.
    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.index()]
    }

    /// Number of declared variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Freezes the registry into a model.
    pub fn finish(self, constraints: ConstraintSet, objective: Expr) -> Model {
        Model {
            variables: self.variables,
            constraints: constraints.constraints,
            objective,
        }
    }
}

/// Append-only collection filled by the constraint stages.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a constraint.
    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Lowers a conditional rule with `big_m` and appends it.
    pub fn push_rule(&mut self, rule: ConditionalRule, big_m: f64) {
        self.constraints.push(rule.lower(big_m));
    }

    /// Number of constraints pushed so far.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns `true` if nothing was pushed.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Constraints appended so far.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }
}

/// A complete minimization model: variables, constraints and objective.
#[derive(Debug, Clone)]
pub struct Model {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Expr,
}

impl Model {
    /// All variables, indexed by [`VarId::index`].
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Looks up a variable.
    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.index()]
    }

    /// All constraints in generation order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Objective to minimize.
    pub fn objective(&self) -> &Expr {
        &self.objective
    }

    /// Number of declared variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraint rows.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Finds a constraint by instance name.
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name() == name)
    }

    /// Constraints generated by one rule.
    pub fn family<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a Constraint> + 'a {
        self.constraints.iter().filter(move |c| c.family() == family)
    }

    /// Counts of variables by kind and constraints by family.
    pub fn stats(&self) -> ModelStats {
        let mut stats = ModelStats::default();
        for v in &self.variables {
            match v.kind() {
                VarKind::Binary => stats.binary += 1,
                VarKind::Integer => stats.integer += 1,
                VarKind::Continuous => stats.continuous += 1,
            }
        }
        for c in &self.constraints {
            stats.constraints += 1;
            if c.is_nonlinear() {
                stats.nonlinear += 1;
            }
            *stats.by_family.entry(c.family()).or_insert(0) += 1;
        }
        stats
    }
}

/// Size summary of a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelStats {
    /// Binary variables.
    pub binary: usize,
    /// General integer variables.
    pub integer: usize,
    /// Continuous variables.
    pub continuous: usize,
    /// Constraint rows.
    pub constraints: usize,
    /// Constraints with at least one bilinear term.
    pub nonlinear: usize,
    /// Row count per constraint family.
    pub by_family: BTreeMap<&'static str, usize>,
}

impl ModelStats {
    /// Total number of variables.
    pub fn variables(&self) -> usize {
        self.binary + self.integer + self.continuous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_model() -> Model {
        let mut b = ModelBuilder::new();
        let x = b.binary("x");
        let y = b.integer("y", 0.0, 10.0);
        let z = b.continuous("z", 0.0, f64::INFINITY);
        let mut cs = ConstraintSet::new();
        cs.push(Constraint::le("link", "link[0]", Expr::from(y) - x * 10.0, Expr::zero()));
        cs.push(Constraint::eq("def", "def[0]", Expr::product(z, x, 1.0), y.into()));
        cs.push(Constraint::le("link", "link[1]", y.into(), Expr::constant(8.0)));
        b.finish(cs, Expr::from(z))
    }

    #[test]
    fn test_handles_are_sequential() {
        let mut b = ModelBuilder::new();
        let a = b.binary("a");
        let c = b.continuous("c", 1.0, 2.0);
        assert_eq!(a.index(), 0);
        assert_eq!(c.index(), 1);
        assert_eq!(b.variable(c).name(), "c");
        assert_eq!(b.num_variables(), 2);
    }

    #[test]
    fn test_stats() {
        let stats = small_model().stats();
        assert_eq!(stats.binary, 1);
        assert_eq!(stats.integer, 1);
        assert_eq!(stats.continuous, 1);
        assert_eq!(stats.variables(), 3);
        assert_eq!(stats.constraints, 3);
        assert_eq!(stats.nonlinear, 1);
        assert_eq!(stats.by_family.get("link"), Some(&2));
    }

    #[test]
    fn test_lookup_by_name_and_family() {
        let model = small_model();
        assert!(model.constraint("def[0]").is_some());
        assert!(model.constraint("missing").is_none());
        assert_eq!(model.family("link").count(), 2);
    }

    #[test]
    fn test_constraint_set_is_append_only() {
        let mut cs = ConstraintSet::new();
        assert!(cs.is_empty());
        cs.push(Constraint::le("a", "a", Expr::zero(), Expr::zero()));
        cs.push(Constraint::le("b", "b", Expr::zero(), Expr::zero()));
        let names: Vec<&str> = cs.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(cs.len(), 2);
    }
}
