//! Route reconstruction from solved arc values.

use serde::Serialize;
use tracing::debug;

use crate::evaluation::Assignment;
use crate::formulation::{RoutingMode, VarId};
use crate::milkrun::{DecisionVariables, MilkRunModel};
use crate::models::Network;

/// A call on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stop {
    Terminal(usize),
    Plant(usize),
}

/// Shape of a reconstructed trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RouteKind {
    /// Two or more plants.
    MilkRun,
    /// One plant, split indicator set.
    Split,
    /// One plant, split indicator off.
    Direct,
}

impl RouteKind {
    /// Classifies a trip by its plant count and routing mode.
    pub fn classify(num_plants: usize, mode: RoutingMode) -> Self {
        match (num_plants, mode) {
            (n, _) if n > 1 => RouteKind::MilkRun,
            (_, RoutingMode::Split) => RouteKind::Split,
            (_, RoutingMode::MilkRun) => RouteKind::Direct,
        }
    }
}

/// One ship's trip, from its departure terminal back to a terminal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Ship index.
    pub ship: usize,
    /// Visited nodes, starting at the departure terminal.
    pub stops: Vec<Stop>,
    /// Trip classification.
    pub kind: RouteKind,
    /// `false` when no return arc leaves the last plant.
    pub closed: bool,
}

impl Route {
    /// Plants in visiting order.
    pub fn plants(&self) -> impl Iterator<Item = usize> + '_ {
        self.stops.iter().filter_map(|s| match s {
            Stop::Plant(j) => Some(*j),
            Stop::Terminal(_) => None,
        })
    }

    /// Number of plant stops.
    pub fn num_plants(&self) -> usize {
        self.plants().count()
    }

    /// Node identifiers in visiting order.
    pub fn labels(&self, network: &Network) -> Vec<String> {
        self.stops
            .iter()
            .map(|s| match *s {
                Stop::Terminal(i) => network.terminals()[i].id().to_string(),
                Stop::Plant(j) => network.plants()[j].id().to_string(),
            })
            .collect()
    }
}

/// Reads routes out of an assignment without modifying it.
///
/// Binaries count as set above the configured binary threshold; a ship is
/// active when its delivered volume exceeds the active-volume threshold.
pub struct RouteReader<'a> {
    vars: &'a DecisionVariables,
    assignment: &'a Assignment,
    binary_threshold: f64,
    volume_threshold: f64,
}

impl<'a> RouteReader<'a> {
    /// Reader over `assignment` for `model`.
    pub fn new(model: &'a MilkRunModel, assignment: &'a Assignment) -> Self {
        Self {
            vars: model.vars(),
            assignment,
            binary_threshold: model.config().binary_threshold,
            volume_threshold: model.config().active_volume_threshold,
        }
    }

    fn set(&self, var: VarId) -> bool {
        self.assignment.is_set(var, self.binary_threshold)
    }

    /// Returns `true` if ship `k` delivers more than the idle threshold.
    pub fn is_active(&self, k: usize) -> bool {
        self.assignment.value(self.vars.ship(k).delivered) > self.volume_threshold
    }

    /// Routing mode of ship `k`.
    pub fn mode(&self, k: usize) -> RoutingMode {
        RoutingMode::from_indicator(
            self.assignment.value(self.vars.ship(k).single_visit),
            self.binary_threshold,
        )
    }

    /// Walks ship `k`'s arcs.
    ///
    /// Starts at the first set terminal→plant arc, follows set plant→plant
    /// arcs to plants not yet visited (lowest index first, at most one step
    /// per plant), then takes the return arc of the last plant. Returns
    /// `None` when the ship has no departure arc.
    pub fn route(&self, k: usize) -> Option<Route> {
        let v = self.vars;
        let (nt, np) = (v.num_terminals(), v.num_plants());

        let (terminal, first) = (0..nt)
            .flat_map(|i| (0..np).map(move |j| (i, j)))
            .find(|&(i, j)| self.set(v.to_plant(i, j, k)))?;

        let mut stops = vec![Stop::Terminal(terminal), Stop::Plant(first)];
        let mut visited = vec![false; np];
        visited[first] = true;
        let mut current = first;

        for _ in 0..np {
            let next = v
                .plant_successors(current, k)
                .find(|&(b, x)| !visited[b] && self.set(x))
                .map(|(b, _)| b);
            match next {
                Some(b) => {
                    visited[b] = true;
                    stops.push(Stop::Plant(b));
                    current = b;
                }
                None => break,
            }
        }

        let back = (0..nt).find(|&i| self.set(v.to_terminal(current, i, k)));
        if let Some(i) = back {
            stops.push(Stop::Terminal(i));
        } else {
            debug!(ship = k, plant = current, "route has no return arc");
        }

        let num_plants = stops.iter().filter(|s| matches!(s, Stop::Plant(_))).count();
        Some(Route {
            ship: k,
            stops,
            kind: RouteKind::classify(num_plants, self.mode(k)),
            closed: back.is_some(),
        })
    }

    /// Routes of all active ships, in fleet order.
    pub fn routes(&self) -> Vec<Route> {
        (0..self.vars.num_ships())
            .filter(|&k| self.is_active(k))
            .filter_map(|k| self.route(k))
            .collect()
    }
}
