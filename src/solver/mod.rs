//! External solver interface.
//!
//! The crate assembles the model; solving it is delegated to a MINLP
//! backend behind the [`Solver`] trait. Infeasible and time-limited runs are
//! ordinary results carried in [`SolveStatus`], not errors.

mod options;
mod result;

pub use options::SolverOptions;
pub use result::{SolveResult, SolveStatus};

use crate::error::SolverError;
use crate::formulation::Model;

/// A MINLP backend.
///
/// Implementations return one value per model variable, in
/// [`VarId::index`](crate::formulation::VarId::index) order, whenever they
/// report a solution.
///
/// Closures with the same signature implement the trait:
///
/// ```
/// use u_milkrun::error::SolverError;
/// use u_milkrun::formulation::{ConstraintSet, Expr, Model, ModelBuilder};
/// use u_milkrun::solver::{SolveResult, Solver, SolverOptions};
///
/// let mut b = ModelBuilder::new();
/// let _ = b.binary("x");
/// let model = b.finish(ConstraintSet::new(), Expr::zero());
/// let infeasible = |_: &Model, _: &SolverOptions| -> Result<SolveResult, SolverError> {
///     Ok(SolveResult::infeasible())
/// };
/// let result = infeasible.solve(&model, &SolverOptions::default()).unwrap();
/// assert!(!result.has_solution());
/// ```
pub trait Solver {
    /// Solves `model` under `options`.
    fn solve(&self, model: &Model, options: &SolverOptions) -> Result<SolveResult, SolverError>;
}

impl<F> Solver for F
where
    F: Fn(&Model, &SolverOptions) -> Result<SolveResult, SolverError>,
{
    fn solve(&self, model: &Model, options: &SolverOptions) -> Result<SolveResult, SolverError> {
        self(model, options)
    }
}
