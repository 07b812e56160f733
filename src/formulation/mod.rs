//! Mixed-integer nonlinear model algebra.
//!
//! Variables with explicit bounds, affine/bilinear expressions, named
//! constraints, Big-M conditional rules keyed by [`RoutingMode`], and the
//! [`Model`] handed to an external solver.

mod conditional;
mod constraint;
mod expr;
mod model;
mod variable;

pub use conditional::{Bound, ConditionalRule, RoutingMode};
pub use constraint::{Constraint, Sense};
pub use expr::Expr;
pub use model::{ConstraintSet, Model, ModelBuilder, ModelStats};
pub use variable::{VarId, VarKind, Variable};
