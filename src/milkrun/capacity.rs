//! Distance, time, volume, tank and cost constraints.

use tracing::warn;

use crate::config::ModelConfig;
use crate::formulation::{Constraint, ConstraintSet, Expr};
use crate::models::{OperatingParams, Ship};

use super::{ConstraintStage, StageContext};

/// Linear cost coefficients of one ship.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CostRates {
    /// Charter cost per hour in service.
    pub rental_per_hour: f64,
    /// Fuel cost per hour in service.
    pub fuel_per_hour: f64,
    /// Tug hire per counted plant visit.
    pub tug_per_call: f64,
    /// Harbor fee per counted plant visit.
    pub harbor_per_call: f64,
    /// Pilot fee per counted plant visit.
    pub pilot_per_call: f64,
}

impl CostRates {
    pub(crate) fn of(ship: &Ship, params: &OperatingParams, config: &ModelConfig) -> Self {
        Self {
            rental_per_hour: config.rental.daily_rate(ship.capacity()) / 24.0,
            fuel_per_hour: params.fuel_price * ship.fuel_rate() / 24.0,
            tug_per_call: ship.tug_rate() * params.tug_hours(),
            harbor_per_call: params.harbor_fee_per_gt * ship.gross_tonnage(),
            pilot_per_call: params.pilot_fee_per_gt * ship.gross_tonnage(),
        }
    }
}

/// Physical and economic accounting of every ship's trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapacityConstraints;

impl ConstraintStage for CapacityConstraints {
    fn name(&self) -> &'static str {
        "capacity"
    }

    fn build(&self, ctx: &StageContext<'_>, out: &mut ConstraintSet) {
        let network = ctx.network;
        let params = network.params();
        let v = ctx.vars;
        let (nt, np) = (v.num_terminals(), v.num_plants());

        for (k, ship) in network.ships().iter().enumerate() {
            let s = ship.id();
            let sv = v.ship(k);
            let cap = ship.capacity();

            let mut sailed = Expr::zero();
            for i in 0..nt {
                for j in 0..np {
                    let d = network.terminal_plant_distance(i, j);
                    sailed.add_term(v.to_plant(i, j, k), d);
                    sailed.add_term(v.to_terminal(j, i, k), d);
                }
            }
            for a in 0..np {
                for (b, x) in v.plant_successors(a, k) {
                    sailed.add_term(x, network.plant_plant_distance(a, b));
                }
            }
            out.push(Constraint::eq(
                "distance_def",
                format!("distance_def[{s}]"),
                sv.distance.into(),
                sailed,
            ));
            out.push(Constraint::eq(
                "sea_time_def",
                format!("sea_time_def[{s}]"),
                sv.sea_time.into(),
                sv.distance * (1.0 / ship.speed()),
            ));
            out.push(Constraint::eq(
                "time_def",
                format!("time_def[{s}]"),
                sv.time.into(),
                Expr::from(sv.sea_time)
                    + v.departures(k) * params.terminal_call_hours()
                    + v.plant_calls(k) * params.plant_call_hours(),
            ));
            out.push(Constraint::le(
                "time_budget",
                format!("time_budget[{s}]"),
                Expr::from(sv.time) - sv.slack_time,
                Expr::constant(params.period_hours()),
            ));

            let mut volume = Expr::zero();
            for j in 0..np {
                for i in 0..nt {
                    volume.add_product(v.tank(j), v.to_plant(i, j, k), 1.0);
                }
                for (_, x) in v.plant_predecessors(j, k) {
                    volume.add_product(v.tank(j), x, 1.0);
                }
            }
            volume += v.returns(k) * (ctx.config.final_leg_fraction * cap);
            out.push(Constraint::eq(
                "delivered_def",
                format!("delivered_def[{s}]"),
                sv.delivered.into(),
                volume,
            ));
            out.push(Constraint::le(
                "capacity_limit",
                format!("capacity_limit[{s}]"),
                Expr::from(sv.delivered) - sv.slack_capacity,
                Expr::constant(cap),
            ));

            let rates = CostRates::of(ship, params, ctx.config);
            let calls = v.plant_calls(k);
            out.push(Constraint::eq(
                "rental_def",
                format!("rental_def[{s}]"),
                sv.rental_cost.into(),
                sv.time * rates.rental_per_hour,
            ));
            out.push(Constraint::eq(
                "fuel_def",
                format!("fuel_def[{s}]"),
                sv.fuel_cost.into(),
                sv.time * rates.fuel_per_hour,
            ));
            out.push(Constraint::eq(
                "tug_def",
                format!("tug_def[{s}]"),
                sv.tug_cost.into(),
                calls.clone() * rates.tug_per_call,
            ));
            out.push(Constraint::eq(
                "harbor_def",
                format!("harbor_def[{s}]"),
                sv.harbor_cost.into(),
                calls.clone() * rates.harbor_per_call,
            ));
            out.push(Constraint::eq(
                "pilot_def",
                format!("pilot_def[{s}]"),
                sv.pilot_cost.into(),
                calls * rates.pilot_per_call,
            ));
        }

        let reserve = params.tank_reserve_fraction;
        for (j, plant) in network.plants().iter().enumerate() {
            let p = plant.id();
            let tank = v.tank(j);
            let required = network.required_volume(j);
            let max_tank = network.max_tank(j);
            if required > (1.0 - reserve) * max_tank {
                warn!(
                    plant = p,
                    required,
                    usable = (1.0 - reserve) * max_tank,
                    "required volume exceeds usable storage; model is infeasible"
                );
            }
            out.push(Constraint::ge(
                "demand_cover",
                format!("demand_cover[{p}]"),
                tank.into(),
                Expr::constant(required),
            ));
            out.push(Constraint::le(
                "tank_max",
                format!("tank_max[{p}]"),
                tank.into(),
                Expr::constant(max_tank),
            ));
            out.push(Constraint::ge(
                "storage_reserve",
                format!("storage_reserve[{p}]"),
                Expr::constant(max_tank) - tank,
                Expr::constant(reserve * max_tank),
            ));
        }
    }
}
