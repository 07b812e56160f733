//! Assignments built from explicit ship plans.

use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::PlanError;
use crate::evaluation::Assignment;
use crate::models::Network;

use super::capacity::CostRates;
use super::DecisionVariables;

/// One ship's trip: leave `terminal`, call at `plants` in order, return.
///
/// Indices refer to positions in the [`Network`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipPlan {
    /// Ship index.
    pub ship: usize,
    /// Departure and return terminal index.
    pub terminal: usize,
    /// Plant indices in visiting order.
    pub plants: Vec<usize>,
}

impl ShipPlan {
    /// Trip of `ship` from `terminal` through `plants`.
    pub fn new(ship: usize, terminal: usize, plants: Vec<usize>) -> Self {
        Self {
            ship,
            terminal,
            plants,
        }
    }
}

/// Fills every variable consistently with the given plans.
///
/// Tanks are set to the required volume, ships without a plan stay idle,
/// slacks take the smallest value the plans need, and a plan shorter than
/// the milk-run minimum marks its ship as splitting. The result may still
/// violate the model (an uncovered plant, a band or tier rule); check it
/// with [`ModelEvaluator`](crate::evaluation::ModelEvaluator).
pub(crate) fn assignment_from_plans(
    network: &Network,
    config: &ModelConfig,
    vars: &DecisionVariables,
    num_variables: usize,
    plans: &[ShipPlan],
) -> Result<Assignment, PlanError> {
    check_plans(network, plans)?;

    let params = network.params();
    let mut a = Assignment::zeros(num_variables);
    for j in 0..network.num_plants() {
        a.set(vars.tank(j), network.required_volume(j));
    }

    for plan in plans {
        let k = plan.ship;
        let i = plan.terminal;
        let ship = &network.ships()[k];
        let sv = vars.ship(k);
        let (Some(&first), Some(&last)) = (plan.plants.first(), plan.plants.last()) else {
            continue;
        };

        let mut calls = vec![0.0; network.num_plants()];
        a.set(vars.to_plant(i, first, k), 1.0);
        calls[first] += 1.0;
        let mut distance = network.terminal_plant_distance(i, first);
        let mut delivered = network.required_volume(first);

        for pair in plan.plants.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if let Some(x) = vars.between(from, to, k) {
                a.set(x, 1.0);
            }
            calls[to] += 1.0;
            distance += network.plant_plant_distance(from, to);
            delivered += network.required_volume(to);
        }

        a.set(vars.to_terminal(last, i, k), 1.0);
        calls[last] += 1.0;
        distance += network.terminal_plant_distance(i, last);
        delivered += config.final_leg_fraction * ship.capacity();

        a.set(vars.terminal_visits(i, k), 2.0);
        for &j in &plan.plants {
            a.set(vars.plant_visits(j, k), calls[j]);
            a.set(vars.assigned(j, k), 1.0);
        }

        let total_calls: f64 = calls.iter().sum();
        let sea_time = distance / ship.speed();
        let time = sea_time + params.terminal_call_hours() + params.plant_call_hours() * total_calls;
        let rates = CostRates::of(ship, params, config);

        a.set(sv.distance, distance);
        a.set(sv.sea_time, sea_time);
        a.set(sv.time, time);
        a.set(sv.slack_time, (time - params.period_hours()).max(0.0));
        a.set(sv.delivered, delivered);
        a.set(sv.slack_capacity, (delivered - ship.capacity()).max(0.0));
        a.set(sv.rental_cost, rates.rental_per_hour * time);
        a.set(sv.fuel_cost, rates.fuel_per_hour * time);
        a.set(sv.tug_cost, rates.tug_per_call * total_calls);
        a.set(sv.harbor_cost, rates.harbor_per_call * total_calls);
        a.set(sv.pilot_cost, rates.pilot_per_call * total_calls);
        a.set(sv.used, 1.0);
        let splits = plan.plants.len() < config.min_milk_run_plants as usize;
        a.set(sv.single_visit, if splits { 1.0 } else { 0.0 });
    }

    Ok(a)
}

fn check_plans(network: &Network, plans: &[ShipPlan]) -> Result<(), PlanError> {
    let range = |kind, index, len| {
        if index < len {
            Ok(())
        } else {
            Err(PlanError::OutOfRange { kind, index, len })
        }
    };
    let mut ship_seen = vec![false; network.num_ships()];
    let mut plant_seen = vec![false; network.num_plants()];

    for plan in plans {
        range("ship", plan.ship, network.num_ships())?;
        range("terminal", plan.terminal, network.num_terminals())?;
        let ship_id = network.ships()[plan.ship].id();
        if std::mem::replace(&mut ship_seen[plan.ship], true) {
            return Err(PlanError::DuplicateShip(ship_id.to_string()));
        }
        if plan.plants.is_empty() {
            return Err(PlanError::EmptyRoute(ship_id.to_string()));
        }
        for &j in &plan.plants {
            range("plant", j, network.num_plants())?;
            if std::mem::replace(&mut plant_seen[j], true) {
                return Err(PlanError::RepeatedPlant(network.plants()[j].id().to_string()));
            }
        }
    }
    Ok(())
}
