//! Structured summary of a solve.

use serde::Serialize;

use crate::evaluation::Assignment;
use crate::formulation::RoutingMode;
use crate::milkrun::{ClassAllowance, MilkRunModel};
use crate::models::ShipClass;
use crate::solver::{SolveResult, SolveStatus};

use super::{RouteKind, RouteReader};

/// Per-period cost components of one ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// Fuel at the configured price.
    pub fuel: f64,
    /// Tug hire for plant calls.
    pub tug: f64,
    /// Harbor and mooring fees.
    pub harbor: f64,
    /// Pilot fees.
    pub pilot: f64,
    /// Charter cost over the hours in service.
    pub rental: f64,
}

impl CostBreakdown {
    /// Sum of all components.
    pub fn total(&self) -> f64 {
        self.fuel + self.tug + self.harbor + self.pilot + self.rental
    }
}

/// Solved values of one ship.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipReport {
    /// Ship identifier.
    pub ship: String,
    /// Ship class.
    pub class: ShipClass,
    /// Solved `used` flag.
    pub used: bool,
    /// Mode read from the split indicator.
    pub mode: RoutingMode,
    /// Nominal capacity.
    pub capacity: f64,
    /// Delivered volume, including the final-leg share.
    pub delivered: f64,
    /// Delivered volume over capacity.
    pub utilization: f64,
    /// Nautical miles sailed.
    pub distance: f64,
    /// Hours at sea.
    pub sea_time: f64,
    /// Hours in service, port calls included.
    pub time: f64,
    /// Per-period cost components.
    pub costs: CostBreakdown,
    /// Volume carried above capacity.
    pub slack_capacity: f64,
    /// Hours beyond the delivery period.
    pub slack_time: f64,
    /// Node identifiers of the trip; only for active ships.
    pub route: Option<Vec<String>>,
    /// Classification of `route`.
    pub kind: Option<RouteKind>,
}

impl ShipReport {
    /// Returns `true` if the ship relies on capacity or time slack.
    pub fn uses_slack(&self, tol: f64) -> bool {
        self.slack_capacity > tol || self.slack_time > tol
    }
}

/// Solved tank level of one plant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantReport {
    /// Plant identifier.
    pub plant: String,
    /// Volume needed for one period.
    pub required: f64,
    /// Solved tank level.
    pub tank: f64,
    /// Ship assigned to the plant, if any.
    pub served_by: Option<String>,
}

/// In-service capacity of one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassUsage {
    /// Class counted.
    pub class: ShipClass,
    /// Ships of the class flagged used.
    pub ships_used: usize,
    /// Ships of the class in the fleet.
    pub ships_total: usize,
    /// Σ capacity of used ships of the class.
    pub capacity_in_service: f64,
}

/// Tier-2 check recomputed from solved `used` flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierCheck {
    /// Class setting the allowance.
    pub lower: ShipClass,
    /// Class being capped.
    pub upper: ShipClass,
    /// In-service capacity of the upper class.
    pub in_service: f64,
    /// Allowance derived from the lower class.
    pub limit: f64,
    /// `in_service ≤ limit` within 1e-6.
    pub satisfied: bool,
}

/// Fleet-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetTotals {
    /// Ships flagged used.
    pub ships_used: usize,
    /// Σ costs over all ships for one period.
    pub period_cost: f64,
    /// `period_cost` scaled to the operational year.
    pub annual_cost: f64,
    /// Σ distance over ships.
    pub total_distance: f64,
    /// Σ delivered volume over ships.
    pub total_delivered: f64,
    /// Σ required volume over plants.
    pub total_required: f64,
    /// Required volume covered at served plants over total required volume.
    pub demand_satisfaction: f64,
    /// Σ capacity slack over ships.
    pub total_slack_capacity: f64,
    /// Σ time slack over ships.
    pub total_slack_time: f64,
}

/// Everything a caller needs to present a solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Status reported by the solver.
    pub status: SolveStatus,
    /// Objective value, if a point was returned.
    pub objective: Option<f64>,
    /// One row per ship, in fleet order.
    pub ships: Vec<ShipReport>,
    /// One row per plant.
    pub plants: Vec<PlantReport>,
    /// One row per ship class.
    pub classes: Vec<ClassUsage>,
    /// Class capacity checks, Mid then Large.
    pub tiers: Vec<TierCheck>,
    /// `None` when the solve returned no assignment.
    pub totals: Option<FleetTotals>,
}

impl Report {
    /// Builds the report of `result`; empty when it carries no assignment.
    pub fn new(model: &MilkRunModel, result: &SolveResult) -> Self {
        match &result.assignment {
            Some(a) => Self::from_assignment(model, result.status, result.objective, a),
            None => Self {
                status: result.status,
                objective: result.objective,
                ships: Vec::new(),
                plants: Vec::new(),
                classes: Vec::new(),
                tiers: Vec::new(),
                totals: None,
            },
        }
    }

    /// Builds the report of an explicit assignment.
    pub fn from_assignment(
        model: &MilkRunModel,
        status: SolveStatus,
        objective: Option<f64>,
        a: &Assignment,
    ) -> Self {
        let network = model.network();
        let v = model.vars();
        let threshold = model.config().binary_threshold;
        let reader = RouteReader::new(model, a);

        let ships: Vec<ShipReport> = network
            .ships()
            .iter()
            .enumerate()
            .map(|(k, ship)| {
                let s = v.ship(k);
                let delivered = a.value(s.delivered);
                let route = reader
                    .is_active(k)
                    .then(|| reader.route(k))
                    .flatten();
                ShipReport {
                    ship: ship.id().to_string(),
                    class: ship.class(),
                    used: a.is_set(s.used, threshold),
                    mode: reader.mode(k),
                    capacity: ship.capacity(),
                    delivered,
                    utilization: delivered / ship.capacity(),
                    distance: a.value(s.distance),
                    sea_time: a.value(s.sea_time),
                    time: a.value(s.time),
                    costs: CostBreakdown {
                        fuel: a.value(s.fuel_cost),
                        tug: a.value(s.tug_cost),
                        harbor: a.value(s.harbor_cost),
                        pilot: a.value(s.pilot_cost),
                        rental: a.value(s.rental_cost),
                    },
                    slack_capacity: a.value(s.slack_capacity),
                    slack_time: a.value(s.slack_time),
                    kind: route.as_ref().map(|r| r.kind),
                    route: route.map(|r| r.labels(network)),
                }
            })
            .collect();

        let plants: Vec<PlantReport> = network
            .plants()
            .iter()
            .enumerate()
            .map(|(j, plant)| PlantReport {
                plant: plant.id().to_string(),
                required: network.required_volume(j),
                tank: a.value(v.tank(j)),
                served_by: (0..network.num_ships())
                    .find(|&k| a.is_set(v.assigned(j, k), threshold))
                    .map(|k| network.ships()[k].id().to_string()),
            })
            .collect();

        let classes: Vec<ClassUsage> = ShipClass::ALL
            .iter()
            .map(|&class| {
                let members: Vec<&ShipReport> =
                    ships.iter().filter(|s| s.class == class).collect();
                let used: Vec<&&ShipReport> = members.iter().filter(|s| s.used).collect();
                ClassUsage {
                    class,
                    ships_used: used.len(),
                    ships_total: members.len(),
                    capacity_in_service: used.iter().map(|s| s.capacity).sum(),
                }
            })
            .collect();

        let in_service = |class: ShipClass| {
            classes
                .iter()
                .find(|c| c.class == class)
                .map_or(0.0, |c| c.capacity_in_service)
        };
        let tiers = ClassAllowance::for_network(network, model.config())
            .into_iter()
            .map(|allowance| {
                let limit = allowance.limit(in_service(allowance.lower));
                let actual = in_service(allowance.upper);
                TierCheck {
                    lower: allowance.lower,
                    upper: allowance.upper,
                    in_service: actual,
                    limit,
                    satisfied: actual <= limit + 1e-6,
                }
            })
            .collect();

        let total_required = network.total_required_volume();
        let covered: f64 = plants
            .iter()
            .filter(|p| p.served_by.is_some())
            .map(|p| p.tank.min(p.required))
            .sum();
        let period_cost: f64 = ships.iter().map(|s| s.costs.total()).sum();
        let totals = FleetTotals {
            ships_used: ships.iter().filter(|s| s.used).count(),
            period_cost,
            annual_cost: period_cost * network.params().periods_per_year(),
            total_distance: ships.iter().map(|s| s.distance).sum(),
            total_delivered: ships.iter().map(|s| s.delivered).sum(),
            total_required,
            demand_satisfaction: if total_required > 0.0 {
                covered / total_required
            } else {
                1.0
            },
            total_slack_capacity: ships.iter().map(|s| s.slack_capacity).sum(),
            total_slack_time: ships.iter().map(|s| s.slack_time).sum(),
        };

        Self {
            status,
            objective,
            ships,
            plants,
            classes,
            tiers,
            totals: Some(totals),
        }
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::milkrun::{test_network, ShipPlan};

    fn solved(plans: &[ShipPlan]) -> (MilkRunModel, Report) {
        let m = MilkRunModel::build(test_network(), ModelConfig::default()).expect("valid");
        let a = m.warm_start(plans).expect("valid");
        let obj = m.evaluate(&a).expect("sized").objective;
        let report = m.report(&SolveResult::optimal(a, obj));
        (m, report)
    }

    #[test]
    fn test_ship_rows() {
        let (_, r) = solved(&[ShipPlan::new(0, 0, vec![1, 2, 0])]);
        assert_eq!(r.ships.len(), 2);
        let shinju = &r.ships[0];
        assert!(shinju.used);
        assert_eq!(shinju.kind, Some(RouteKind::MilkRun));
        assert_eq!(
            shinju.route.as_deref(),
            Some(&["Donggi", "Ambon", "Seram", "Tual", "Donggi"].map(String::from)[..])
        );
        assert!(shinju.utilization > 0.5 && shinju.utilization < 1.0);
        assert!(!shinju.uses_slack(1e-9));
        let coral = &r.ships[1];
        assert!(!coral.used);
        assert!(coral.route.is_none());
        assert_eq!(coral.costs.total(), 0.0);
    }

    #[test]
    fn test_totals_and_plants() {
        let (m, r) = solved(&[ShipPlan::new(0, 0, vec![1, 2, 0])]);
        let totals = r.totals.as_ref().expect("assignment present");
        assert_eq!(totals.ships_used, 1);
        assert!((totals.demand_satisfaction - 1.0).abs() < 1e-9);
        assert!((totals.annual_cost - totals.period_cost * 330.0 / 7.0).abs() < 1e-3);
        assert!((totals.total_required - m.network().total_required_volume()).abs() < 1e-9);
        assert!(r.plants.iter().all(|p| p.served_by.as_deref() == Some("Shinju_1")));
    }

    #[test]
    fn test_partial_coverage() {
        let (m, r) = solved(&[ShipPlan::new(0, 0, vec![1])]);
        let totals = r.totals.expect("assignment present");
        let expected = m.network().required_volume(1) / m.network().total_required_volume();
        assert!((totals.demand_satisfaction - expected).abs() < 1e-9);
        assert_eq!(r.ships[0].kind, Some(RouteKind::Split));
    }

    #[test]
    fn test_tier_checks() {
        let (_, r) = solved(&[ShipPlan::new(1, 0, vec![1, 2, 0])]);
        let large = r
            .tiers
            .iter()
            .find(|t| t.upper == ShipClass::Large)
            .expect("large tier");
        assert_eq!(large.in_service, 7500.0);
        assert!(!large.satisfied);
        let coral = r
            .classes
            .iter()
            .find(|c| c.class == ShipClass::Large)
            .expect("class row");
        assert_eq!((coral.ships_used, coral.ships_total), (1, 1));
    }

    #[test]
    fn test_serializes() {
        let (_, r) = solved(&[ShipPlan::new(0, 0, vec![1, 2, 0])]);
        let json = r.to_json().expect("serializable");
        assert!(json.contains("\"demand_satisfaction\""));
        assert!(json.contains("\"MilkRun\""));
    }
}
