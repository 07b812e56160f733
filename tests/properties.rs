//! Property tests over randomly generated networks and ship plans.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use u_milkrun::config::ModelConfig;
use u_milkrun::distance::DistanceMatrix;
use u_milkrun::evaluation::ViolationType;
use u_milkrun::interpret::{RouteKind, RouteReader};
use u_milkrun::milkrun::{MilkRunModel, ShipPlan};
use u_milkrun::models::{Network, OperatingParams, PowerPlant, Ship, ShipClass, Terminal};

/// A random network and a plan covering every plant with trips of at most
/// two plants. The plant count is capped at two per ship so such a plan exists.
fn random_instance(seed: u64, np: usize, nt: usize, ns: usize) -> (Network, Vec<ShipPlan>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let np = np.min(2 * ns);

    let terminals = (0..nt).map(|i| Terminal::new(format!("T{}", i + 1))).collect();
    let plants = (0..np)
        .map(|j| {
            let demand = rng.random_range(5.0..40.0);
            let storage = demand * rng.random_range(1.3..3.0);
            PowerPlant::new(format!("P{}", j + 1), demand, storage)
        })
        .collect();
    let ships = (0..ns)
        .map(|k| {
            let class = ShipClass::ALL[rng.random_range(0..3)];
            Ship::new(
                format!("{}_{}", class.label(), k + 1),
                class,
                rng.random_range(3000.0..8000.0),
                rng.random_range(18.0..26.0),
            )
            .with_fuel_rate(rng.random_range(5.0..20.0))
            .with_gross_tonnage(rng.random_range(2000.0..8000.0))
            .with_tug_rate(rng.random_range(20.0..50.0))
        })
        .collect();

    let mut tp = DistanceMatrix::new(nt, np);
    for i in 0..nt {
        for j in 0..np {
            tp.set(i, j, rng.random_range(50.0..250.0));
        }
    }
    let mut pp = DistanceMatrix::square(np);
    for a in 0..np {
        for b in (a + 1)..np {
            let d = rng.random_range(20.0..150.0);
            pp.set(a, b, d);
            pp.set(b, a, d);
        }
    }

    let network = Network::new(
        terminals,
        plants,
        ships,
        tp,
        pp,
        OperatingParams::default(),
    )
    .expect("generated network is valid");

    let mut order: Vec<usize> = (0..np).collect();
    order.shuffle(&mut rng);
    let trips = rng.random_range(np.div_ceil(2)..=ns.min(np));
    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); trips];
    for (pos, &j) in order.iter().enumerate() {
        routes[pos % trips].push(j);
    }
    let mut fleet: Vec<usize> = (0..ns).collect();
    fleet.shuffle(&mut rng);

    let mut plans = Vec::with_capacity(trips);
    for (plants, ship) in routes.into_iter().zip(fleet) {
        plans.push(ShipPlan::new(ship, rng.random_range(0..nt), plants));
    }
    (network, plans)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn plant_flow_is_conserved(
        seed in any::<u64>(),
        np in 2usize..=6,
        nt in 1usize..=3,
        ns in 1usize..=4,
    ) {
        let (network, plans) = random_instance(seed, np, nt, ns);
        let model = MilkRunModel::build(network, ModelConfig::default()).expect("valid");
        let a = model.warm_start(&plans).expect("valid plans");
        let v = model.vars();
        let np = model.network().num_plants();

        for k in 0..ns {
            for j in 0..np {
                let inbound = v.inbound(j, k).eval(|x| a.value(x));
                let outbound = v.outbound(j, k).eval(|x| a.value(x));
                prop_assert!((inbound - outbound).abs() < 1e-9);
            }
        }
        for c in model.model().family("plant_flow") {
            prop_assert!(c.is_satisfied(|x| a.value(x), 1e-9), "{} violated", c.name());
        }
    }

    #[test]
    fn each_plant_is_claimed_by_one_ship(
        seed in any::<u64>(),
        np in 2usize..=6,
        nt in 1usize..=3,
        ns in 1usize..=4,
    ) {
        let (network, plans) = random_instance(seed, np, nt, ns);
        let model = MilkRunModel::build(network, ModelConfig::default()).expect("valid");
        let a = model.warm_start(&plans).expect("valid plans");
        let v = model.vars();

        for j in 0..model.network().num_plants() {
            let claims = (0..ns).filter(|&k| a.is_set(v.assigned(j, k), 0.5)).count();
            prop_assert_eq!(claims, 1);
        }
    }

    #[test]
    fn plans_satisfy_structural_and_accounting_rows(
        seed in any::<u64>(),
        np in 2usize..=6,
        nt in 1usize..=3,
        ns in 1usize..=4,
    ) {
        let (network, plans) = random_instance(seed, np, nt, ns);
        let model = MilkRunModel::build(network, ModelConfig::default()).expect("valid");
        let a = model.warm_start(&plans).expect("valid plans");
        let eval = model.evaluate(&a).expect("sized");

        // band_lower and class_priority depend on fleet mix and fill level
        for violation in &eval.violations {
            match &violation.kind {
                ViolationType::ConstraintViolated { family, .. } => {
                    prop_assert!(
                        *family == "band_lower" || *family == "class_priority",
                        "unexpected violation {:?}",
                        violation
                    );
                }
                other => prop_assert!(false, "unexpected violation {:?}", other),
            }
        }

        for k in 0..ns {
            let s = model.vars().ship(k);
            let cap = model.network().ships()[k].capacity();
            prop_assert!(a.value(s.delivered) <= cap * 1.01 + 1e-6);
        }
    }

    #[test]
    fn routes_match_plans_and_reading_is_idempotent(
        seed in any::<u64>(),
        np in 2usize..=6,
        nt in 1usize..=3,
        ns in 1usize..=4,
    ) {
        let (network, plans) = random_instance(seed, np, nt, ns);
        let model = MilkRunModel::build(network, ModelConfig::default()).expect("valid");
        let a = model.warm_start(&plans).expect("valid plans");
        let before = a.clone();

        let routes = model.routes(&a);
        prop_assert_eq!(routes.len(), plans.len());
        for plan in &plans {
            let route = routes
                .iter()
                .find(|r| r.ship == plan.ship)
                .expect("planned ship has a route");
            prop_assert_eq!(route.plants().collect::<Vec<_>>(), plan.plants.clone());
            prop_assert!(route.closed);
            if plan.plants.len() == 2 {
                prop_assert_eq!(route.kind, RouteKind::MilkRun);
            } else {
                prop_assert_eq!(route.kind, RouteKind::Split);
            }
        }

        let reader = RouteReader::new(&model, &a);
        for k in 0..ns {
            let s = model.vars().ship(k);
            if a.is_set(s.used, 0.5) && !a.is_set(s.single_visit, 0.5) {
                let r = reader.route(k).expect("used ship departs");
                prop_assert!(r.num_plants() >= 2);
            }
        }

        prop_assert_eq!(model.routes(&a), routes);
        prop_assert_eq!(a, before);
    }
}
