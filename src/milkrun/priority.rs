//! Tiered ship-class priority policy.
//!
//! - Tier 1: a ship in milk-run mode visits at least two plants and stays
//!   within the utilization band.
//! - Tier 2: in-service capacity of a larger class is capped relative to the
//!   next smaller class plus a period-dependent buffer.
//! - Tier 3: a ship may only carry capacity slack on a split trip when some
//!   ship of the next larger class is also splitting.

use serde::Serialize;

use crate::config::ModelConfig;
use crate::formulation::{Bound, ConditionalRule, Constraint, ConstraintSet, Expr, RoutingMode};
use crate::models::{Network, ShipClass};

use super::{ConstraintStage, StageContext};

/// Tier-2 rule between two adjacent classes:
/// `Σ cap·used[upper] ≤ ratio · Σ cap·used[lower] + buffer`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassAllowance {
    /// Class whose in-service capacity sets the allowance.
    pub lower: ShipClass,
    /// Class being capped.
    pub upper: ShipClass,
    /// Upper capacity allowed per unit of lower capacity.
    pub ratio: f64,
    /// Absolute buffer volume for the network's period.
    pub buffer: f64,
}

impl ClassAllowance {
    /// Allowances for `Small→Mid` and `Mid→Large`.
    pub fn for_network(network: &Network, config: &ModelConfig) -> Vec<ClassAllowance> {
        let bucket = config.buffer_for_period(network.params().period_days);
        let demand = network.total_required_volume();
        ShipClass::ALL
            .iter()
            .filter_map(|&lower| {
                let upper = lower.upgrade()?;
                let (ratio, fraction) = match upper {
                    ShipClass::Mid => (config.mid_over_small_ratio, bucket.mid),
                    _ => (config.large_over_mid_ratio, bucket.large),
                };
                Some(ClassAllowance {
                    lower,
                    upper,
                    ratio,
                    buffer: fraction * demand,
                })
            })
            .collect()
    }

    /// Largest in-service capacity of `upper` given the `lower` capacity.
    pub fn limit(&self, lower_in_service: f64) -> f64 {
        self.ratio * lower_in_service + self.buffer
    }
}

/// Constraints encoding the three priority tiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityConstraints;

impl ConstraintStage for PriorityConstraints {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn build(&self, ctx: &StageContext<'_>, out: &mut ConstraintSet) {
        let network = ctx.network;
        let config = ctx.config;
        let v = ctx.vars;
        let m = config.big_m;

        for (k, ship) in network.ships().iter().enumerate() {
            let s = ship.id();
            let sv = v.ship(k);
            let cap = ship.capacity();

            out.push_rule(
                ConditionalRule::new(
                    "milk_run_minimum",
                    format!("milk_run_minimum[{s}]"),
                    v.visited_plants(k),
                    Bound::AtLeast,
                    sv.used * f64::from(config.min_milk_run_plants),
                    sv.single_visit,
                    RoutingMode::MilkRun,
                ),
                m,
            );
            out.push_rule(
                ConditionalRule::new(
                    "band_upper",
                    format!("band_upper[{s}]"),
                    sv.delivered.into(),
                    Bound::AtMost,
                    Expr::constant((1.0 + config.split_band) * cap),
                    sv.single_visit,
                    RoutingMode::MilkRun,
                ),
                m,
            );
            out.push_rule(
                ConditionalRule::new(
                    "band_lower",
                    format!("band_lower[{s}]"),
                    sv.delivered.into(),
                    Bound::AtLeast,
                    Expr::constant((1.0 - config.split_band) * cap),
                    sv.single_visit,
                    RoutingMode::Split,
                ),
                m,
            );

            out.push(Constraint::ge(
                "ship_used_link",
                format!("ship_used_link[{s}]"),
                sv.used.into(),
                v.departures(k),
            ));
            out.push(Constraint::le(
                "slack_cap",
                format!("slack_cap[{s}]"),
                sv.slack_capacity.into(),
                Expr::constant(config.capacity_slack_fraction * cap),
            ));

            if let Some(upper) = ship.class().upgrade() {
                let upper_splits =
                    Expr::sum_of(network.ships_of(upper).map(|u| v.ship(u).single_visit));
                out.push(Constraint::le(
                    "split_upgrade",
                    format!("split_upgrade[{s}]"),
                    Expr::product(sv.slack_capacity, sv.single_visit, 1.0),
                    upper_splits * m,
                ));
            }
        }

        for allowance in ClassAllowance::for_network(network, config) {
            let in_service = |class: ShipClass| {
                Expr::weighted(
                    network
                        .ships_of(class)
                        .map(|k| (v.ship(k).used, network.ships()[k].capacity())),
                )
            };
            out.push(Constraint::le(
                "class_priority",
                format!("class_priority[{}]", allowance.upper),
                in_service(allowance.upper),
                in_service(allowance.lower) * allowance.ratio + allowance.buffer,
            ));
        }
    }
}
