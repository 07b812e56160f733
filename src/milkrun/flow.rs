//! Flow conservation, degree, visit-count and assignment constraints.

use crate::formulation::{Constraint, ConstraintSet, Expr};

use super::{ConstraintStage, StageContext};

/// Routing-graph structure of every ship's trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowConstraints;

impl ConstraintStage for FlowConstraints {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn build(&self, ctx: &StageContext<'_>, out: &mut ConstraintSet) {
        let v = ctx.vars;
        let (nt, np, ns) = (v.num_terminals(), v.num_plants(), v.num_ships());

        for k in 0..ns {
            let s = ctx.ship(k);
            out.push(Constraint::eq(
                "terminal_balance",
                format!("terminal_balance[{s}]"),
                v.departures(k),
                v.returns(k),
            ));
            out.push(Constraint::le(
                "single_departure",
                format!("single_departure[{s}]"),
                v.departures(k),
                Expr::constant(1.0),
            ));
            out.push(Constraint::le(
                "single_return",
                format!("single_return[{s}]"),
                v.returns(k),
                Expr::constant(1.0),
            ));

            for i in 0..nt {
                let t = ctx.terminal(i);
                let leaving = Expr::sum_of((0..np).map(|j| v.to_plant(i, j, k)));
                let entering = Expr::sum_of((0..np).map(|j| v.to_terminal(j, i, k)));
                out.push(Constraint::eq(
                    "terminal_return",
                    format!("terminal_return[{t},{s}]"),
                    leaving.clone(),
                    entering.clone(),
                ));
                out.push(Constraint::eq(
                    "terminal_visits_link",
                    format!("terminal_visits_link[{t},{s}]"),
                    v.terminal_visits(i, k).into(),
                    leaving + entering,
                ));
                out.push(Constraint::le(
                    "terminal_visit_cap",
                    format!("terminal_visit_cap[{t},{s}]"),
                    v.terminal_visits(i, k).into(),
                    Expr::constant(f64::from(ctx.config.max_terminal_visits)),
                ));
            }

            for j in 0..np {
                let p = ctx.plant(j);
                out.push(Constraint::eq(
                    "plant_flow",
                    format!("plant_flow[{p},{s}]"),
                    v.inbound(j, k),
                    v.outbound(j, k),
                ));
                // a plant hands off to another plant only when entered from a terminal
                out.push(Constraint::le(
                    "flow_continuity",
                    format!("flow_continuity[{p},{s}]"),
                    Expr::sum_of(v.plant_successors(j, k).map(|(_, x)| x)),
                    Expr::sum_of((0..nt).map(|i| v.to_plant(i, j, k))),
                ));

                let calls = Expr::sum_of(
                    (0..nt)
                        .map(|i| v.to_plant(i, j, k))
                        .chain((0..nt).map(|i| v.to_terminal(j, i, k)))
                        .chain(v.plant_predecessors(j, k).map(|(_, x)| x)),
                );
                out.push(Constraint::eq(
                    "plant_visits_link",
                    format!("plant_visits_link[{p},{s}]"),
                    v.plant_visits(j, k).into(),
                    calls,
                ));
                out.push(Constraint::le(
                    "plant_visit_cap",
                    format!("plant_visit_cap[{p},{s}]"),
                    v.plant_visits(j, k).into(),
                    Expr::constant(f64::from(ctx.config.max_plant_visits)),
                ));
                out.push(Constraint::eq(
                    "assignment_link",
                    format!("assignment_link[{p},{s}]"),
                    v.assigned(j, k).into(),
                    v.inbound(j, k),
                ));
            }
        }

        for j in 0..np {
            let p = ctx.plant(j);
            out.push(Constraint::le(
                "plant_inbound",
                format!("plant_inbound[{p}]"),
                (0..ns).map(|k| v.inbound(j, k)).sum::<Expr>(),
                Expr::constant(1.0),
            ));
            out.push(Constraint::ge(
                "plant_coverage",
                format!("plant_coverage[{p}]"),
                Expr::sum_of((0..ns).map(|k| v.plant_visits(j, k))),
                Expr::constant(1.0),
            ));
            out.push(Constraint::eq(
                "assignment_unique",
                format!("assignment_unique[{p}]"),
                Expr::sum_of((0..ns).map(|k| v.assigned(j, k))),
                Expr::constant(1.0),
            ));
        }

        out.push(Constraint::le(
            "subtour_limit",
            "subtour_limit",
            v.all_plant_arcs(),
            Expr::constant(np.saturating_sub(1) as f64),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::formulation::ModelBuilder;
    use crate::milkrun::{
        paired_network, paired_plans, test_network, DecisionVariables, MilkRunModel, ShipPlan,
    };

    fn paired() -> MilkRunModel {
        MilkRunModel::build(paired_network(), ModelConfig::default()).expect("valid")
    }

    #[test]
    fn test_constraint_counts() {
        let network = test_network();
        let config = ModelConfig::default();
        let mut b = ModelBuilder::new();
        let vars = DecisionVariables::declare(&network, &config, &mut b);
        let ctx = StageContext {
            network: &network,
            config: &config,
            vars: &vars,
        };
        let mut out = ConstraintSet::new();
        FlowConstraints.build(&ctx, &mut out);

        let (t, p, s) = (1, 3, 2);
        let per_ship = 3 + 3 * t + 5 * p;
        let per_plant = 3;
        assert_eq!(out.len(), per_ship * s + per_plant * p + 1);

        let subtour = out
            .iter()
            .find(|c| c.name() == "subtour_limit")
            .expect("present");
        assert_eq!(subtour.rhs(), 2.0);
    }

    #[test]
    fn test_continuity_needs_terminal_arrival() {
        let m = paired();
        let a = m.warm_start(&paired_plans()).expect("valid plans");
        let eval = m.evaluate(&a).expect("sized");
        assert!(!eval.violates("flow_continuity[Ambon,Shinju_1]"));

        // Donggi -> Ambon -> Seram -> Tual -> Donggi
        let chain = m
            .warm_start(&[
                ShipPlan::new(0, 0, vec![1, 2, 0]),
                ShipPlan::new(1, 0, vec![3]),
            ])
            .expect("valid plans");
        let eval = m.evaluate(&chain).expect("sized");
        assert!(!eval.violates("flow_continuity[Ambon,Shinju_1]"));
        assert!(eval.violates("flow_continuity[Seram,Shinju_1]"));
        assert!(!eval.violates("flow_continuity[Tual,Shinju_1]"));
        assert!(!eval.violates("plant_flow[Seram,Shinju_1]"));
    }

    #[test]
    fn test_return_to_departure_terminal() {
        let m = paired();
        let v = m.vars();
        let mut a = m.warm_start(&paired_plans()).expect("valid plans");
        let eval = m.evaluate(&a).expect("sized");
        assert!(!eval.violates("terminal_return[Donggi,Shinju_1]"));

        // Shinju_1 leaves Donggi but ends its trip at Bontang
        a.set(v.to_terminal(2, 0, 0), 0.0);
        a.set(v.to_terminal(2, 1, 0), 1.0);
        let eval = m.evaluate(&a).expect("sized");
        assert!(eval.violates("terminal_return[Donggi,Shinju_1]"));
        assert!(eval.violates("terminal_return[Bontang,Shinju_1]"));
        assert!(!eval.violates("terminal_balance[Shinju_1]"));
    }

    #[test]
    fn test_detached_plant_cycle_exceeds_subtour_limit() {
        let m = paired();
        let v = m.vars();
        let mut a = m.warm_start(&paired_plans()).expect("valid plans");
        assert!(!m.evaluate(&a).expect("sized").violates("subtour_limit"));

        // WSD59_1 circles Tual <-> Saumlaki without leaving a terminal
        a.set(v.between(0, 3, 2).expect("arc"), 1.0);
        a.set(v.between(3, 0, 2).expect("arc"), 1.0);
        let eval = m.evaluate(&a).expect("sized");
        assert!(eval.violates("subtour_limit"));
        assert!(!eval.violates("plant_flow[Tual,WSD59_1]"));
        assert!(eval.violates("flow_continuity[Tual,WSD59_1]"));
    }
}
