//! Assignment checking.
//!
//! Holds solved or hand-built variable values and verifies them against a
//! model's bounds, integrality requirements and constraints.

mod assignment;
mod evaluator;

pub use assignment::Assignment;
pub use evaluator::{Evaluation, ModelEvaluator, Violation, ViolationType};
