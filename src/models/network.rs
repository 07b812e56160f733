//! Validated network data: terminals, plants, fleet, distances, parameters.

use std::collections::HashSet;

use crate::distance::DistanceMatrix;
use crate::error::NetworkError;

use super::{OperatingParams, PowerPlant, Ship, ShipClass, Terminal};

/// Immutable, validated input of one optimization run.
///
/// Terminals, plants and ships are addressed by their position in the
/// respective slice. Construction fails fast on malformed data, so every
/// model built from a `Network` can rely on positive speeds and capacities
/// and non-negative distances.
///
/// # Examples
///
/// ```
/// use u_milkrun::distance::DistanceMatrix;
/// use u_milkrun::models::{Network, OperatingParams, PowerPlant, Ship, ShipClass, Terminal};
///
/// let mut tp = DistanceMatrix::new(1, 2);
/// tp.set(0, 0, 100.0);
/// tp.set(0, 1, 120.0);
/// let mut pp = DistanceMatrix::square(2);
/// pp.set(0, 1, 30.0);
/// pp.set(1, 0, 30.0);
///
/// let network = Network::new(
///     vec![Terminal::new("T1")],
///     vec![PowerPlant::new("P1", 50.0, 90.0), PowerPlant::new("P2", 40.0, 80.0)],
///     vec![Ship::new("Shinju_1", ShipClass::Small, 2513.0, 24.0)],
///     tp,
///     pp,
///     OperatingParams::default(),
/// )
/// .unwrap();
/// assert_eq!(network.num_plants(), 2);
/// assert!((network.total_required_volume() - 630.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Network {
    terminals: Vec<Terminal>,
    plants: Vec<PowerPlant>,
    ships: Vec<Ship>,
    terminal_plant: DistanceMatrix,
    plant_plant: DistanceMatrix,
    params: OperatingParams,
}

impl Network {
    /// Validates and assembles a network.
    ///
    /// `terminal_plant` has one row per terminal and one column per plant and
    /// serves both the outbound and the return leg. `plant_plant` is square
    /// over the plants.
    pub fn new(
        terminals: Vec<Terminal>,
        plants: Vec<PowerPlant>,
        ships: Vec<Ship>,
        terminal_plant: DistanceMatrix,
        plant_plant: DistanceMatrix,
        params: OperatingParams,
    ) -> Result<Self, NetworkError> {
        if terminals.is_empty() {
            return Err(NetworkError::Empty("terminals"));
        }
        if plants.is_empty() {
            return Err(NetworkError::Empty("plants"));
        }
        if ships.is_empty() {
            return Err(NetworkError::Empty("ships"));
        }

        check_unique("terminal", terminals.iter().map(|t| t.id()))?;
        check_unique("plant", plants.iter().map(|p| p.id()))?;
        check_unique("ship", ships.iter().map(|s| s.id()))?;

        for plant in &plants {
            validate_plant(plant)?;
        }
        for ship in &ships {
            validate_ship(ship)?;
        }

        check_shape("terminal-plant", &terminal_plant, terminals.len(), plants.len())?;
        check_shape("plant-plant", &plant_plant, plants.len(), plants.len())?;
        if let Some((i, j, value)) = terminal_plant.find_invalid() {
            return Err(NetworkError::InvalidDistance {
                from: terminals[i].id().to_string(),
                to: plants[j].id().to_string(),
                value,
            });
        }
        if let Some((a, b, value)) = plant_plant.find_invalid() {
            return Err(NetworkError::InvalidDistance {
                from: plants[a].id().to_string(),
                to: plants[b].id().to_string(),
                value,
            });
        }

        params.validate()?;

        Ok(Self {
            terminals,
            plants,
            ships,
            terminal_plant,
            plant_plant,
            params,
        })
    }

    /// All terminals.
    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    /// All power plants.
    pub fn plants(&self) -> &[PowerPlant] {
        &self.plants
    }

    /// The whole fleet pool.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Scalar operating parameters.
    pub fn params(&self) -> &OperatingParams {
        &self.params
    }

    /// Number of terminals.
    pub fn num_terminals(&self) -> usize {
        self.terminals.len()
    }

    /// Number of plants.
    pub fn num_plants(&self) -> usize {
        self.plants.len()
    }

    /// Number of ships.
    pub fn num_ships(&self) -> usize {
        self.ships.len()
    }

    /// Distance between terminal `i` and plant `j` (either direction).
    pub fn terminal_plant_distance(&self, i: usize, j: usize) -> f64 {
        self.terminal_plant.get(i, j)
    }

    /// Distance from plant `from` to plant `to`.
    pub fn plant_plant_distance(&self, from: usize, to: usize) -> f64 {
        self.plant_plant.get(from, to)
    }

    /// Volume plant `j` needs for one delivery period.
    pub fn required_volume(&self, j: usize) -> f64 {
        self.plants[j].required_volume(self.params.period_days)
    }

    /// Largest volume plant `j` can store for one delivery period.
    pub fn max_tank(&self, j: usize) -> f64 {
        self.plants[j].max_tank(self.params.period_days)
    }

    /// Sum of required volumes over all plants.
    pub fn total_required_volume(&self) -> f64 {
        (0..self.plants.len()).map(|j| self.required_volume(j)).sum()
    }

    /// Sum of maximum tank volumes over all plants.
    pub fn total_max_tank(&self) -> f64 {
        (0..self.plants.len()).map(|j| self.max_tank(j)).sum()
    }

    /// Indices of the ships of one class, in fleet order.
    pub fn ships_of(&self, class: ShipClass) -> impl Iterator<Item = usize> + '_ {
        self.ships
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.class() == class)
            .map(|(k, _)| k)
    }

    /// Position of the terminal with the given identifier.
    pub fn terminal_index(&self, id: &str) -> Option<usize> {
        self.terminals.iter().position(|t| t.id() == id)
    }

    /// Position of the plant with the given identifier.
    pub fn plant_index(&self, id: &str) -> Option<usize> {
        self.plants.iter().position(|p| p.id() == id)
    }

    /// Position of the ship with the given identifier.
    pub fn ship_index(&self, id: &str) -> Option<usize> {
        self.ships.iter().position(|s| s.id() == id)
    }
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), NetworkError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(NetworkError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn check_shape(
    table: &'static str,
    matrix: &DistanceMatrix,
    expected_rows: usize,
    expected_cols: usize,
) -> Result<(), NetworkError> {
    if matrix.rows() != expected_rows || matrix.cols() != expected_cols {
        return Err(NetworkError::DistanceShape {
            table,
            rows: matrix.rows(),
            cols: matrix.cols(),
            expected_rows,
            expected_cols,
        });
    }
    Ok(())
}

fn validate_plant(plant: &PowerPlant) -> Result<(), NetworkError> {
    let demand = plant.demand();
    if !demand.is_finite() || demand < 0.0 {
        return Err(NetworkError::InvalidDemand {
            plant: plant.id().to_string(),
            value: demand,
        });
    }
    let storage = plant.storage_capacity();
    if !storage.is_finite() || storage <= 0.0 {
        return Err(NetworkError::InvalidStorage {
            plant: plant.id().to_string(),
            value: storage,
        });
    }
    if demand > storage {
        return Err(NetworkError::DemandExceedsStorage {
            plant: plant.id().to_string(),
            demand,
            storage,
        });
    }
    Ok(())
}

fn validate_ship(ship: &Ship) -> Result<(), NetworkError> {
    for (field, value) in [("capacity", ship.capacity()), ("speed", ship.speed())] {
        if !value.is_finite() || value <= 0.0 {
            return Err(NetworkError::NonPositiveShipValue {
                ship: ship.id().to_string(),
                field,
                value,
            });
        }
    }
    for (field, value) in [
        ("fuel_rate", ship.fuel_rate()),
        ("gross_tonnage", ship.gross_tonnage()),
        ("tug_rate", ship.tug_rate()),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(NetworkError::NegativeShipValue {
                ship: ship.id().to_string(),
                field,
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> (Vec<Terminal>, Vec<PowerPlant>, Vec<Ship>, DistanceMatrix, DistanceMatrix) {
        let terminals = vec![Terminal::new("T1"), Terminal::new("T2")];
        let plants = vec![
            PowerPlant::new("P1", 50.0, 90.0),
            PowerPlant::new("P2", 40.0, 80.0),
        ];
        let ships = vec![
            Ship::new("Shinju_1", ShipClass::Small, 2513.0, 24.076),
            Ship::new("WSD59_1", ShipClass::Mid, 5000.0, 25.928),
            Ship::new("Shinju_2", ShipClass::Small, 2513.0, 24.076),
        ];
        let tp = DistanceMatrix::from_data(2, 2, vec![100.0, 120.0, 200.0, 210.0]).expect("2x2");
        let pp = DistanceMatrix::from_data(2, 2, vec![0.0, 30.0, 30.0, 0.0]).expect("2x2");
        (terminals, plants, ships, tp, pp)
    }

    fn build(
        parts: (Vec<Terminal>, Vec<PowerPlant>, Vec<Ship>, DistanceMatrix, DistanceMatrix),
    ) -> Result<Network, NetworkError> {
        let (t, p, s, tp, pp) = parts;
        Network::new(t, p, s, tp, pp, OperatingParams::default())
    }

    #[test]
    fn test_valid_network() {
        let n = build(parts()).expect("valid");
        assert_eq!(n.num_terminals(), 2);
        assert_eq!(n.num_plants(), 2);
        assert_eq!(n.num_ships(), 3);
        assert_eq!(n.terminal_plant_distance(1, 0), 200.0);
        assert_eq!(n.plant_plant_distance(0, 1), 30.0);
        assert!((n.required_volume(0) - 350.0).abs() < 1e-9);
        assert!((n.max_tank(1) - 560.0).abs() < 1e-9);
        assert!((n.total_max_tank() - 1190.0).abs() < 1e-9);
    }

    #[test]
    fn test_ships_of_groups_by_class() {
        let n = build(parts()).expect("valid");
        assert_eq!(n.ships_of(ShipClass::Small).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(n.ships_of(ShipClass::Mid).collect::<Vec<_>>(), vec![1]);
        assert_eq!(n.ships_of(ShipClass::Large).count(), 0);
    }

    #[test]
    fn test_lookup_by_id() {
        let n = build(parts()).expect("valid");
        assert_eq!(n.terminal_index("T2"), Some(1));
        assert_eq!(n.plant_index("P1"), Some(0));
        assert_eq!(n.ship_index("WSD59_1"), Some(1));
        assert_eq!(n.ship_index("Coral_1"), None);
    }

    #[test]
    fn test_rejects_duplicate_ship() {
        let mut p = parts();
        p.2.push(Ship::new("Shinju_1", ShipClass::Small, 2513.0, 24.0));
        assert_eq!(
            build(p).unwrap_err(),
            NetworkError::DuplicateId {
                kind: "ship",
                id: "Shinju_1".into()
            }
        );
    }

    #[test]
    fn test_rejects_negative_distance() {
        let mut p = parts();
        p.3.set(0, 1, -5.0);
        assert!(matches!(
            build(p),
            Err(NetworkError::InvalidDistance { value, .. }) if value == -5.0
        ));
    }

    #[test]
    fn test_rejects_non_positive_capacity() {
        let mut p = parts();
        p.2[1] = Ship::new("WSD59_1", ShipClass::Mid, 0.0, 25.0);
        assert!(matches!(
            build(p),
            Err(NetworkError::NonPositiveShipValue { field: "capacity", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_speed() {
        let mut p = parts();
        p.2[0] = Ship::new("Shinju_1", ShipClass::Small, 2513.0, 0.0);
        assert!(matches!(
            build(p),
            Err(NetworkError::NonPositiveShipValue { field: "speed", .. })
        ));
    }

    #[test]
    fn test_rejects_demand_above_storage() {
        let mut p = parts();
        p.1[0] = PowerPlant::new("P1", 100.0, 90.0);
        assert!(matches!(build(p), Err(NetworkError::DemandExceedsStorage { .. })));
    }

    #[test]
    fn test_accepts_zero_demand() {
        let mut p = parts();
        p.1[0] = PowerPlant::new("P1", 0.0, 90.0);
        assert!(build(p).is_ok());
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let mut p = parts();
        p.4 = DistanceMatrix::square(3);
        assert!(matches!(
            build(p),
            Err(NetworkError::DistanceShape { table: "plant-plant", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_fleet() {
        let mut p = parts();
        p.2.clear();
        assert_eq!(build(p).unwrap_err(), NetworkError::Empty("ships"));
    }
}
