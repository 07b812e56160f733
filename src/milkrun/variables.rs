//! Decision variables of the milk-run model.

use crate::config::ModelConfig;
use crate::formulation::{Expr, ModelBuilder, VarId};
use crate::models::Network;

/// Per-ship scalar variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipVars {
    /// Nautical miles sailed.
    pub distance: VarId,
    /// Hours at sea.
    pub sea_time: VarId,
    /// Hours in service, `[0, period_hours]`.
    pub time: VarId,
    /// Volume carried, including the final-leg nominal share.
    pub delivered: VarId,
    /// Fuel cost per period.
    pub fuel_cost: VarId,
    /// Tug hire per period.
    pub tug_cost: VarId,
    /// Harbor and mooring fees per period.
    pub harbor_cost: VarId,
    /// Pilot fees per period.
    pub pilot_cost: VarId,
    /// Charter cost per period.
    pub rental_cost: VarId,
    /// Delivered volume above capacity, `[0, fraction·capacity]`.
    pub slack_capacity: VarId,
    /// Hours above the period.
    pub slack_time: VarId,
    /// Split indicator: 1 lets the ship serve a single plant.
    pub single_visit: VarId,
    /// Set when the ship leaves a terminal.
    pub used: VarId,
}

/// Every variable of the model, laid out by terminal, plant and ship index.
///
/// Arc variables exist for terminal→plant, plant→terminal and every ordered
/// pair of distinct plants. There are no terminal→terminal arcs and no
/// plant self-loops.
#[derive(Debug, Clone)]
pub struct DecisionVariables {
    num_terminals: usize,
    num_plants: usize,
    num_ships: usize,
    ships: Vec<ShipVars>,
    to_plant: Vec<VarId>,
    between: Vec<Option<VarId>>,
    to_terminal: Vec<VarId>,
    terminal_visits: Vec<VarId>,
    plant_visits: Vec<VarId>,
    assigned: Vec<VarId>,
    tank: Vec<VarId>,
}

impl DecisionVariables {
    /// Declares all variables with their bounds.
    pub fn declare(network: &Network, config: &ModelConfig, b: &mut ModelBuilder) -> Self {
        let num_terminals = network.num_terminals();
        let num_plants = network.num_plants();
        let num_ships = network.num_ships();
        let params = network.params();
        let inf = f64::INFINITY;

        let ships = network
            .ships()
            .iter()
            .map(|ship| {
                let s = ship.id();
                ShipVars {
                    distance: b.continuous(format!("distance[{s}]"), 0.0, inf),
                    sea_time: b.continuous(format!("sea_time[{s}]"), 0.0, inf),
                    time: b.continuous(format!("time[{s}]"), 0.0, params.period_hours()),
                    delivered: b.continuous(format!("delivered[{s}]"), 0.0, inf),
                    fuel_cost: b.continuous(format!("fuel_cost[{s}]"), 0.0, inf),
                    tug_cost: b.continuous(format!("tug_cost[{s}]"), 0.0, inf),
                    harbor_cost: b.continuous(format!("harbor_cost[{s}]"), 0.0, inf),
                    pilot_cost: b.continuous(format!("pilot_cost[{s}]"), 0.0, inf),
                    rental_cost: b.continuous(format!("rental_cost[{s}]"), 0.0, inf),
                    slack_capacity: b.continuous(
                        format!("slack_capacity[{s}]"),
                        0.0,
                        config.capacity_slack_fraction * ship.capacity(),
                    ),
                    slack_time: b.continuous(format!("slack_time[{s}]"), 0.0, inf),
                    single_visit: b.binary(format!("single_visit[{s}]")),
                    used: b.binary(format!("used[{s}]")),
                }
            })
            .collect();

        let terminal = |i: usize| network.terminals()[i].id();
        let plant = |j: usize| network.plants()[j].id();
        let ship = |k: usize| network.ships()[k].id();

        let mut to_plant = Vec::with_capacity(num_terminals * num_plants * num_ships);
        for i in 0..num_terminals {
            for j in 0..num_plants {
                for k in 0..num_ships {
                    to_plant.push(b.binary(format!("x[{},{},{}]", terminal(i), plant(j), ship(k))));
                }
            }
        }

        let mut between = Vec::with_capacity(num_plants * num_plants * num_ships);
        for a in 0..num_plants {
            for c in 0..num_plants {
                for k in 0..num_ships {
                    between.push((a != c).then(|| {
                        b.binary(format!("x[{},{},{}]", plant(a), plant(c), ship(k)))
                    }));
                }
            }
        }

        let mut to_terminal = Vec::with_capacity(num_plants * num_terminals * num_ships);
        for j in 0..num_plants {
            for i in 0..num_terminals {
                for k in 0..num_ships {
                    to_terminal.push(b.binary(format!("x[{},{},{}]", plant(j), terminal(i), ship(k))));
                }
            }
        }

        let t_cap = f64::from(config.max_terminal_visits);
        let p_cap = f64::from(config.max_plant_visits);

        let mut terminal_visits = Vec::with_capacity(num_terminals * num_ships);
        for i in 0..num_terminals {
            for k in 0..num_ships {
                terminal_visits.push(b.integer(format!("y[{},{}]", terminal(i), ship(k)), 0.0, t_cap));
            }
        }

        let mut plant_visits = Vec::with_capacity(num_plants * num_ships);
        let mut assigned = Vec::with_capacity(num_plants * num_ships);
        for j in 0..num_plants {
            for k in 0..num_ships {
                plant_visits.push(b.integer(format!("y[{},{}]", plant(j), ship(k)), 0.0, p_cap));
                assigned.push(b.binary(format!("assigned[{},{}]", plant(j), ship(k))));
            }
        }

        let tank = (0..num_plants)
            .map(|j| {
                b.continuous(
                    format!("tank[{}]", plant(j)),
                    network.required_volume(j),
                    network.max_tank(j),
                )
            })
            .collect();

        Self {
            num_terminals,
            num_plants,
            num_ships,
            ships,
            to_plant,
            between,
            to_terminal,
            terminal_visits,
            plant_visits,
            assigned,
            tank,
        }
    }

    /// Terminal count the layout was declared for.
    pub fn num_terminals(&self) -> usize {
        self.num_terminals
    }

    /// Plant count the layout was declared for.
    pub fn num_plants(&self) -> usize {
        self.num_plants
    }

    /// Ship count the layout was declared for.
    pub fn num_ships(&self) -> usize {
        self.num_ships
    }

    /// Scalar variables of ship `k`.
    pub fn ship(&self, k: usize) -> &ShipVars {
        &self.ships[k]
    }

    /// Arc terminal `i` → plant `j` sailed by ship `k`.
    pub fn to_plant(&self, i: usize, j: usize, k: usize) -> VarId {
        self.to_plant[(i * self.num_plants + j) * self.num_ships + k]
    }

    /// Arc plant `from` → plant `to` sailed by ship `k`; `None` when
    /// `from == to`.
    pub fn between(&self, from: usize, to: usize, k: usize) -> Option<VarId> {
        self.between[(from * self.num_plants + to) * self.num_ships + k]
    }

    /// Arc plant `j` → terminal `i` sailed by ship `k`.
    pub fn to_terminal(&self, j: usize, i: usize, k: usize) -> VarId {
        self.to_terminal[(j * self.num_terminals + i) * self.num_ships + k]
    }

    /// Visit counter of terminal `i` by ship `k`.
    pub fn terminal_visits(&self, i: usize, k: usize) -> VarId {
        self.terminal_visits[i * self.num_ships + k]
    }

    /// Visit counter of plant `j` by ship `k`.
    pub fn plant_visits(&self, j: usize, k: usize) -> VarId {
        self.plant_visits[j * self.num_ships + k]
    }

    /// Whether ship `k` serves plant `j`.
    pub fn assigned(&self, j: usize, k: usize) -> VarId {
        self.assigned[j * self.num_ships + k]
    }

    /// Tank level delivered to plant `j`.
    pub fn tank(&self, j: usize) -> VarId {
        self.tank[j]
    }

    /// Plant→plant arcs leaving plant `j` for ship `k`.
    pub fn plant_successors(&self, j: usize, k: usize) -> impl Iterator<Item = (usize, VarId)> + '_ {
        (0..self.num_plants).filter_map(move |b| self.between(j, b, k).map(|v| (b, v)))
    }

    /// Plant→plant arcs entering plant `j` for ship `k`.
    pub fn plant_predecessors(&self, j: usize, k: usize) -> impl Iterator<Item = (usize, VarId)> + '_ {
        (0..self.num_plants).filter_map(move |a| self.between(a, j, k).map(|v| (a, v)))
    }

    /// Σ terminal→plant arcs of ship `k`.
    pub fn departures(&self, k: usize) -> Expr {
        Expr::sum_of(
            (0..self.num_terminals)
                .flat_map(|i| (0..self.num_plants).map(move |j| (i, j)))
                .map(|(i, j)| self.to_plant(i, j, k)),
        )
    }

    /// Σ plant→terminal arcs of ship `k`.
    pub fn returns(&self, k: usize) -> Expr {
        Expr::sum_of(
            (0..self.num_plants)
                .flat_map(|j| (0..self.num_terminals).map(move |i| (j, i)))
                .map(|(j, i)| self.to_terminal(j, i, k)),
        )
    }

    /// Arcs of ship `k` entering plant `j`, from a terminal or another plant.
    pub fn inbound(&self, j: usize, k: usize) -> Expr {
        Expr::sum_of(
            (0..self.num_terminals)
                .map(|i| self.to_plant(i, j, k))
                .chain(self.plant_predecessors(j, k).map(|(_, v)| v)),
        )
    }

    /// Arcs of ship `k` leaving plant `j`, to a terminal or another plant.
    pub fn outbound(&self, j: usize, k: usize) -> Expr {
        Expr::sum_of(
            (0..self.num_terminals)
                .map(|i| self.to_terminal(j, i, k))
                .chain(self.plant_successors(j, k).map(|(_, v)| v)),
        )
    }

    /// Plants entered by ship `k`.
    pub fn visited_plants(&self, k: usize) -> Expr {
        (0..self.num_plants).map(|j| self.inbound(j, k)).sum()
    }

    /// Σ plant visit counters of ship `k`.
    pub fn plant_calls(&self, k: usize) -> Expr {
        Expr::sum_of((0..self.num_plants).map(|j| self.plant_visits(j, k)))
    }

    /// Σ plant→plant arcs over all ships.
    pub fn all_plant_arcs(&self) -> Expr {
        Expr::sum_of(self.between.iter().flatten().copied())
    }
}
