//! Affine and bilinear expressions over model variables.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use super::VarId;

/// `Σ cᵢ·xᵢ + Σ cₖ·xₐ·x_b + constant`.
///
/// Bilinear terms appear where a continuous quantity is switched by a
/// binary (tank volume times arc, slack times split flag). Terms are kept
/// as appended; evaluation does not require them to be merged.
///
/// # Examples
///
/// ```
/// use u_milkrun::formulation::{Expr, ModelBuilder};
///
/// let mut b = ModelBuilder::new();
/// let x = b.binary("x");
/// let t = b.continuous("t", 0.0, 10.0);
/// let e = Expr::from(x) * 2.0 + Expr::product(t, x, 1.0) + 3.0;
/// let value = e.eval(|v| if v == x { 1.0 } else { 4.0 });
/// assert_eq!(value, 9.0);
/// assert!(!e.is_linear());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    linear: Vec<(VarId, f64)>,
    products: Vec<(VarId, VarId, f64)>,
    constant: f64,
}

impl Expr {
    /// The zero expression.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A constant expression.
    pub fn constant(value: f64) -> Self {
        Self {
            constant: value,
            ..Self::default()
        }
    }

    /// `coef·var`.
    pub fn term(var: VarId, coef: f64) -> Self {
        Self {
            linear: vec![(var, coef)],
            ..Self::default()
        }
    }

    /// `coef·a·b`.
    pub fn product(a: VarId, b: VarId, coef: f64) -> Self {
        Self {
            products: vec![(a, b, coef)],
            ..Self::default()
        }
    }

    /// `Σ var` over the given variables.
    pub fn sum_of(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self::weighted(vars.into_iter().map(|v| (v, 1.0)))
    }

    /// `Σ coef·var` over the given pairs.
    pub fn weighted(terms: impl IntoIterator<Item = (VarId, f64)>) -> Self {
        Self {
            linear: terms.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Appends `coef·var`.
    pub fn add_term(&mut self, var: VarId, coef: f64) -> &mut Self {
        self.linear.push((var, coef));
        self
    }

    /// Appends `coef·a·b`.
    pub fn add_product(&mut self, a: VarId, b: VarId, coef: f64) -> &mut Self {
        self.products.push((a, b, coef));
        self
    }

    /// Linear terms.
    pub fn linear_terms(&self) -> &[(VarId, f64)] {
        &self.linear
    }

    /// Bilinear terms.
    pub fn product_terms(&self) -> &[(VarId, VarId, f64)] {
        &self.products
    }

    /// Constant part.
    pub fn constant_value(&self) -> f64 {
        self.constant
    }

    /// Returns `true` if there are no bilinear terms.
    pub fn is_linear(&self) -> bool {
        self.products.is_empty()
    }

    /// Returns `true` if there are no variable terms at all.
    pub fn is_constant(&self) -> bool {
        self.linear.is_empty() && self.products.is_empty()
    }

    /// The same expression without its constant part.
    pub fn without_constant(mut self) -> Self {
        self.constant = 0.0;
        self
    }

    /// Evaluates the expression with the given variable values.
    pub fn eval(&self, value: impl Fn(VarId) -> f64) -> f64 {
        let linear: f64 = self.linear.iter().map(|&(v, c)| c * value(v)).sum();
        let products: f64 = self
            .products
            .iter()
            .map(|&(a, b, c)| c * value(a) * value(b))
            .sum();
        linear + products + self.constant
    }

    /// Every variable referenced, possibly with repeats.
    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.linear
            .iter()
            .map(|&(v, _)| v)
            .chain(self.products.iter().flat_map(|&(a, b, _)| [a, b]))
    }
}

impl From<VarId> for Expr {
    fn from(var: VarId) -> Self {
        Expr::term(var, 1.0)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::constant(value)
    }
}

impl AddAssign for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        self.linear.extend(rhs.linear);
        self.products.extend(rhs.products);
        self.constant += rhs.constant;
    }
}

impl<T: Into<Expr>> Add<T> for Expr {
    type Output = Expr;

    fn add(mut self, rhs: T) -> Expr {
        self += rhs.into();
        self
    }
}

impl<T: Into<Expr>> Sub<T> for Expr {
    type Output = Expr;

    fn sub(mut self, rhs: T) -> Expr {
        self += -rhs.into();
        self
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;

    fn mul(mut self, k: f64) -> Expr {
        for (_, c) in &mut self.linear {
            *c *= k;
        }
        for (_, _, c) in &mut self.products {
            *c *= k;
        }
        self.constant *= k;
        self
    }
}

impl Mul<f64> for VarId {
    type Output = Expr;

    fn mul(self, k: f64) -> Expr {
        Expr::term(self, k)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self * -1.0
    }
}

impl Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Expr {
        iter.fold(Expr::zero(), |acc, e| acc + e)
    }
}
