//! Constraint stage seam.

use crate::config::ModelConfig;
use crate::formulation::ConstraintSet;
use crate::models::Network;

use super::DecisionVariables;

/// Read-only inputs shared by every stage.
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    /// Validated input data.
    pub network: &'a Network,
    /// Policy configuration.
    pub config: &'a ModelConfig,
    /// Variables declared before any stage runs.
    pub vars: &'a DecisionVariables,
}

impl StageContext<'_> {
    pub(crate) fn terminal(&self, i: usize) -> &str {
        self.network.terminals()[i].id()
    }

    pub(crate) fn plant(&self, j: usize) -> &str {
        self.network.plants()[j].id()
    }

    pub(crate) fn ship(&self, k: usize) -> &str {
        self.network.ships()[k].id()
    }
}

/// A group of constraints generated from declared variables.
///
/// Stages never declare variables and never remove constraints; they only
/// append to the set they are given.
pub trait ConstraintStage {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Appends this stage's constraints.
    fn build(&self, ctx: &StageContext<'_>, out: &mut ConstraintSet);
}
