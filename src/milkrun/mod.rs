//! The LNG milk-run routing model.
//!
//! [`MilkRunModel::build`] declares the decision variables, runs the flow,
//! capacity and priority stages in that order, and attaches the annualized
//! cost objective. Each stage only appends constraints; none of them
//! declares variables.

mod capacity;
mod flow;
mod objective;
mod priority;
mod stage;
mod variables;
mod warm_start;

pub use capacity::CapacityConstraints;
pub use flow::FlowConstraints;
pub use objective::objective;
pub use priority::{ClassAllowance, PriorityConstraints};
pub use stage::{ConstraintStage, StageContext};
pub use variables::{DecisionVariables, ShipVars};
pub use warm_start::ShipPlan;

use tracing::{debug, info, instrument, warn};

use crate::config::ModelConfig;
use crate::error::Error;
use crate::evaluation::{Assignment, Evaluation, ModelEvaluator};
use crate::formulation::{ConstraintSet, Model, ModelBuilder};
use crate::interpret::{Report, Route, RouteReader};
use crate::models::Network;
use crate::solver::{SolveResult, SolveStatus, Solver, SolverOptions};

/// A built milk-run model together with the data it was built from.
///
/// # Examples
///
/// ```
/// use u_milkrun::config::ModelConfig;
/// use u_milkrun::milkrun::{MilkRunModel, ShipPlan};
/// use u_milkrun::models::NetworkInput;
///
/// let json = r#"{
///   "terminals": ["T1"],
///   "plants": [
///     {"id": "P1", "demand": 50, "storage_capacity": 120},
///     {"id": "P2", "demand": 40, "storage_capacity": 100}
///   ],
///   "fleet": [{"class": "Small", "count": 1, "capacity": 1000, "speed": 20}],
///   "terminal_plant": [
///     {"from": "T1", "to": "P1", "distance": 200},
///     {"from": "T1", "to": "P2", "distance": 260}
///   ],
///   "plant_plant": [{"from": "P1", "to": "P2", "distance": 80}]
/// }"#;
/// let network = NetworkInput::from_json(json).unwrap().into_network().unwrap();
/// let model = MilkRunModel::build(network, ModelConfig::default()).unwrap();
///
/// let start = model.warm_start(&[ShipPlan::new(0, 0, vec![0, 1])]).unwrap();
/// let routes = model.routes(&start);
/// assert_eq!(routes[0].labels(model.network()), ["T1", "P1", "P2", "T1"]);
/// ```
#[derive(Debug, Clone)]
pub struct MilkRunModel {
    network: Network,
    config: ModelConfig,
    vars: DecisionVariables,
    model: Model,
}

impl MilkRunModel {
    /// Validates the configuration and assembles the full model.
    #[instrument(
        skip_all,
        fields(
            terminals = network.num_terminals(),
            plants = network.num_plants(),
            ships = network.num_ships(),
        )
    )]
    pub fn build(network: Network, config: ModelConfig) -> Result<Self, Error> {
        config.validate()?;

        let largest_volume = network.total_max_tank();
        if config.big_m < largest_volume {
            warn!(
                big_m = config.big_m,
                largest_volume, "Big-M is below the largest deliverable volume"
            );
        }

        let mut builder = ModelBuilder::new();
        let vars = DecisionVariables::declare(&network, &config, &mut builder);
        debug!(variables = builder.num_variables(), "declared decision variables");

        let mut constraints = ConstraintSet::new();
        {
            let ctx = StageContext {
                network: &network,
                config: &config,
                vars: &vars,
            };
            let stages: [&dyn ConstraintStage; 3] =
                [&FlowConstraints, &CapacityConstraints, &PriorityConstraints];
            for stage in stages {
                let before = constraints.len();
                stage.build(&ctx, &mut constraints);
                debug!(
                    stage = stage.name(),
                    added = constraints.len() - before,
                    "constraint stage built"
                );
            }
        }

        let objective = objective(&network, &config, &vars);
        let model = builder.finish(constraints, objective);

        let stats = model.stats();
        info!(
            variables = stats.variables(),
            binary = stats.binary,
            integer = stats.integer,
            constraints = stats.constraints,
            nonlinear = stats.nonlinear,
            "milk-run model built"
        );

        Ok(Self {
            network,
            config,
            vars,
            model,
        })
    }

    /// Network the model was built from.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Policy configuration the model was built with.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Variable layout.
    pub fn vars(&self) -> &DecisionVariables {
        &self.vars
    }

    /// The assembled model handed to a solver.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Runs `solver` and checks that its result fits the model.
    #[instrument(skip_all, fields(time_limit = options.time_limit_secs))]
    pub fn solve<S: Solver + ?Sized>(
        &self,
        solver: &S,
        options: &SolverOptions,
    ) -> Result<SolveResult, Error> {
        options.validate()?;
        let result = solver.solve(&self.model, options)?;
        result.check(self.model.num_variables())?;
        match result.status {
            SolveStatus::Optimal => info!(objective = ?result.objective, "solved to optimality"),
            status => warn!(%status, objective = ?result.objective, "solve ended without an optimal solution"),
        }
        Ok(result)
    }

    /// Builds a consistent assignment from explicit ship plans.
    pub fn warm_start(&self, plans: &[ShipPlan]) -> Result<Assignment, Error> {
        let a = warm_start::assignment_from_plans(
            &self.network,
            &self.config,
            &self.vars,
            self.model.num_variables(),
            plans,
        )?;
        Ok(a)
    }

    /// Checks an assignment against every bound and constraint.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<Evaluation, Error> {
        Ok(ModelEvaluator::new(&self.model).evaluate(assignment)?)
    }

    /// Routes of every active ship.
    pub fn routes(&self, assignment: &Assignment) -> Vec<Route> {
        RouteReader::new(self, assignment).routes()
    }

    /// Structured report of a solve.
    pub fn report(&self, result: &SolveResult) -> Report {
        Report::new(self, result)
    }
}

/// Donggi terminal, three Maluku plants, one Shinju and one Coral.
#[cfg(test)]
pub(crate) fn test_network() -> Network {
    use crate::distance::DistanceMatrix;
    use crate::models::{OperatingParams, PowerPlant, Ship, ShipClass, Terminal};

    let plants = vec![
        PowerPlant::new("Tual", 26.4, 91.3),
        PowerPlant::new("Ambon", 125.0, 273.91),
        PowerPlant::new("Seram", 53.02, 182.61),
    ];
    let mut tp = DistanceMatrix::new(1, 3);
    tp.set(0, 0, 1120.4);
    tp.set(0, 1, 877.85);
    tp.set(0, 2, 946.37);
    let mut pp = DistanceMatrix::square(3);
    for (a, b, d) in [(0, 1, 330.5), (0, 2, 310.2), (1, 2, 150.01)] {
        pp.set(a, b, d);
        pp.set(b, a, d);
    }
    let ships = vec![
        Ship::new("Shinju_1", ShipClass::Small, 2513.0, 24.076)
            .with_fuel_rate(7.7)
            .with_gross_tonnage(2930.0)
            .with_tug_rate(30.02),
        Ship::new("Coral_1", ShipClass::Large, 7500.0, 25.928)
            .with_fuel_rate(20.5)
            .with_gross_tonnage(7833.0)
            .with_tug_rate(46.76),
    ];
    match Network::new(
        vec![Terminal::new("Donggi")],
        plants,
        ships,
        tp,
        pp,
        OperatingParams::default(),
    ) {
        Ok(n) => n,
        Err(e) => panic!("test network is valid: {e}"),
    }
}

/// Donggi and Bontang terminals, four plants, two Shinju, one WSD59 and one
/// Coral. Two two-plant Shinju trips from Donggi cover every plant feasibly.
#[cfg(test)]
pub(crate) fn paired_network() -> Network {
    use crate::distance::DistanceMatrix;
    use crate::models::{OperatingParams, PowerPlant, Ship, ShipClass, Terminal};

    let plants = vec![
        PowerPlant::new("Tual", 26.4, 91.3),
        PowerPlant::new("Ambon", 125.0, 273.91),
        PowerPlant::new("Seram", 53.02, 182.61),
        PowerPlant::new("Saumlaki", 40.0, 100.0),
    ];
    let mut tp = DistanceMatrix::new(2, 4);
    for (j, (donggi, bontang)) in [
        (1120.4, 1500.0),
        (877.85, 1250.0),
        (946.37, 1280.0),
        (1300.0, 1650.0),
    ]
    .into_iter()
    .enumerate()
    {
        tp.set(0, j, donggi);
        tp.set(1, j, bontang);
    }
    let mut pp = DistanceMatrix::square(4);
    for (a, b, d) in [
        (0, 1, 330.5),
        (0, 2, 310.2),
        (0, 3, 290.0),
        (1, 2, 150.01),
        (1, 3, 600.0),
        (2, 3, 560.0),
    ] {
        pp.set(a, b, d);
        pp.set(b, a, d);
    }
    let shinju = |id: &str| {
        Ship::new(id, ShipClass::Small, 2513.0, 24.076)
            .with_fuel_rate(7.7)
            .with_gross_tonnage(2930.0)
            .with_tug_rate(30.02)
    };
    let ships = vec![
        shinju("Shinju_1"),
        shinju("Shinju_2"),
        Ship::new("WSD59_1", ShipClass::Mid, 5000.0, 25.0)
            .with_fuel_rate(12.0)
            .with_gross_tonnage(5000.0)
            .with_tug_rate(40.0),
        Ship::new("Coral_1", ShipClass::Large, 7500.0, 25.928)
            .with_fuel_rate(20.5)
            .with_gross_tonnage(7833.0)
            .with_tug_rate(46.76),
    ];
    match Network::new(
        vec![Terminal::new("Donggi"), Terminal::new("Bontang")],
        plants,
        ships,
        tp,
        pp,
        OperatingParams::default(),
    ) {
        Ok(n) => n,
        Err(e) => panic!("paired network is valid: {e}"),
    }
}

/// Shinju_1 runs Ambon and Seram, Shinju_2 runs Tual and Saumlaki.
#[cfg(test)]
pub(crate) fn paired_plans() -> [ShipPlan; 2] {
    [
        ShipPlan::new(0, 0, vec![1, 2]),
        ShipPlan::new(1, 0, vec![0, 3]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;

    fn model() -> MilkRunModel {
        MilkRunModel::build(test_network(), ModelConfig::default()).expect("valid")
    }

    #[test]
    fn test_build_stats() {
        let m = model();
        let stats = m.model().stats();
        assert_eq!(stats.variables(), m.model().num_variables());
        assert_eq!(stats.by_family.get("plant_flow"), Some(&6));
        assert_eq!(stats.by_family.get("class_priority"), Some(&2));
        assert_eq!(stats.by_family.get("split_upgrade"), Some(&1));
        // delivered volume and tier-3 cascade rows are bilinear
        assert_eq!(stats.nonlinear, 2 + 1);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = ModelConfig {
            split_band: 1.5,
            ..ModelConfig::default()
        };
        assert!(matches!(
            MilkRunModel::build(test_network(), config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_paired_milk_runs_are_feasible() {
        let m = MilkRunModel::build(paired_network(), ModelConfig::default()).expect("valid");
        let a = m.warm_start(&paired_plans()).expect("valid plans");
        let eval = m.evaluate(&a).expect("sized");
        assert!(eval.is_feasible(), "violations: {:?}", eval.violations);
        assert!(eval.objective > 0.0);
    }

    #[test]
    fn test_three_plant_chain_breaks_continuity() {
        let m = model();
        let a = m
            .warm_start(&[ShipPlan::new(0, 0, vec![1, 2, 0])])
            .expect("valid plan");
        let eval = m.evaluate(&a).expect("sized");
        // Seram is entered from Ambon, not from Donggi
        assert!(eval.violates("flow_continuity[Seram,Shinju_1]"));
        assert!(!eval.violates("flow_continuity[Ambon,Shinju_1]"));
        assert_eq!(eval.violations.len(), 1);
    }

    #[test]
    fn test_uncovered_plant_is_reported() {
        let m = model();
        let a = m
            .warm_start(&[ShipPlan::new(0, 0, vec![1, 2])])
            .expect("valid plan");
        let eval = m.evaluate(&a).expect("sized");
        assert!(eval.violates("plant_coverage[Tual]"));
        assert!(eval.violates("assignment_unique[Tual]"));
    }

    #[test]
    fn test_solve_checks_result_size() {
        let m = model();
        let short = |_: &Model, _: &SolverOptions| -> Result<SolveResult, SolverError> {
            Ok(SolveResult::optimal(Assignment::zeros(3), 0.0))
        };
        assert!(matches!(
            m.solve(&short, &SolverOptions::default()),
            Err(Error::Solver(SolverError::AssignmentSize { .. }))
        ));
    }

    #[test]
    fn test_solve_passes_through_infeasible() {
        let m = model();
        let none = |_: &Model, _: &SolverOptions| -> Result<SolveResult, SolverError> {
            Ok(SolveResult::infeasible())
        };
        let r = m.solve(&none, &SolverOptions::default()).expect("valid result");
        assert_eq!(r.status, SolveStatus::Infeasible);
        assert!(m.report(&r).totals.is_none());
    }
}
