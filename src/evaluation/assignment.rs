//! Variable values returned by a solver or built by hand.

use serde::{Deserialize, Serialize};

use crate::formulation::VarId;

/// One value per model variable, indexed by [`VarId::index`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    /// All-zero assignment for a model with `len` variables.
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    /// Wraps raw solver values.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Value of a variable. Handles outside the assignment read as zero.
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }

    /// Sets the value of a variable.
    ///
    /// # Panics
    ///
    /// Panics if `var` is outside the assignment.
    pub fn set(&mut self, var: VarId, value: f64) {
        self.values[var.index()] = value;
    }

    /// Reads a binary as set when its value exceeds `threshold`.
    pub fn is_set(&self, var: VarId, threshold: f64) -> bool {
        self.value(var) > threshold
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no values are held.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
