//! Annualized cost objective with slack penalties.

use crate::config::ModelConfig;
use crate::formulation::Expr;
use crate::models::Network;

use super::DecisionVariables;

/// `periods_per_year · Σ costs + penalty · Σ (capacity slack + time slack)`.
pub fn objective(network: &Network, config: &ModelConfig, vars: &DecisionVariables) -> Expr {
    let periods = network.params().periods_per_year();
    let mut costs = Expr::zero();
    let mut slacks = Expr::zero();
    for k in 0..vars.num_ships() {
        let s = vars.ship(k);
        costs += Expr::sum_of([
            s.fuel_cost,
            s.tug_cost,
            s.harbor_cost,
            s.pilot_cost,
            s.rental_cost,
        ]);
        slacks += Expr::sum_of([s.slack_capacity, s.slack_time]);
    }
    costs * periods + slacks * config.slack_penalty
}
