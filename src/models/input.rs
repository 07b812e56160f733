//! Serializable network input with keyed distance tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{ConfigError, NetworkError};

use super::{Network, OperatingParams, PowerPlant, Ship, ShipClass, Terminal};

/// One keyed distance entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceEntry {
    /// Source node identifier.
    pub from: String,
    /// Destination node identifier.
    pub to: String,
    /// Nautical miles.
    pub distance: f64,
}

impl DistanceEntry {
    /// Entry from `from` to `to`.
    pub fn new(from: impl Into<String>, to: impl Into<String>, distance: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            distance,
        }
    }
}

/// A block of identical ships of one class.
///
/// Expanded into `count` ships named `{name}_1` … `{name}_{count}`; the name
/// defaults to the class label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetEntry {
    /// Class of every ship in the block.
    pub class: ShipClass,
    #[serde(default)]
    pub name: Option<String>,
    /// Number of ships.
    pub count: usize,
    /// Cargo capacity per ship.
    pub capacity: f64,
    /// Service speed in knots.
    pub speed: f64,
    #[serde(default)]
    pub fuel_rate: f64,
    #[serde(default)]
    pub gross_tonnage: f64,
    #[serde(default)]
    pub tug_rate: f64,
}

impl FleetEntry {
    fn expand(&self) -> impl Iterator<Item = Ship> + '_ {
        let name = self.name.as_deref().unwrap_or(self.class.label());
        (1..=self.count).map(move |n| {
            Ship::new(format!("{name}_{n}"), self.class, self.capacity, self.speed)
                .with_fuel_rate(self.fuel_rate)
                .with_gross_tonnage(self.gross_tonnage)
                .with_tug_rate(self.tug_rate)
        })
    }
}

/// Network description as supplied by a data-loading collaborator.
///
/// Terminal→plant entries serve both the outbound and return leg.
/// Plant→plant entries may be given in one direction only; the reverse
/// direction then reuses the same distance. The distance from a plant to
/// itself is zero.
///
/// # Examples
///
/// ```
/// use u_milkrun::models::NetworkInput;
///
/// let json = r#"{
///   "terminals": ["Tangguh"],
///   "plants": [
///     {"id": "Sorong", "demand": 241.37, "storage_capacity": 456.52},
///     {"id": "Manokwari", "demand": 117.45, "storage_capacity": 182.61}
///   ],
///   "fleet": [{"class": "Shinju", "count": 2, "capacity": 2513, "speed": 24.076}],
///   "terminal_plant": [
///     {"from": "Tangguh", "to": "Sorong", "distance": 448.18},
///     {"from": "Tangguh", "to": "Manokwari", "distance": 838.96}
///   ],
///   "plant_plant": [{"from": "Sorong", "to": "Manokwari", "distance": 438.92}]
/// }"#;
/// let network = NetworkInput::from_json(json).unwrap().into_network().unwrap();
/// assert_eq!(network.num_ships(), 2);
/// assert_eq!(network.ships()[1].id(), "Shinju_2");
/// assert_eq!(network.plant_plant_distance(1, 0), 438.92);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInput {
    /// Terminal identifiers.
    pub terminals: Vec<String>,
    /// Plants with demand and storage.
    pub plants: Vec<PowerPlant>,
    /// Fleet blocks, expanded in order.
    pub fleet: Vec<FleetEntry>,
    /// Terminal to plant distances.
    pub terminal_plant: Vec<DistanceEntry>,
    /// Plant to plant distances.
    pub plant_plant: Vec<DistanceEntry>,
    #[serde(default)]
    pub params: OperatingParams,
}

impl NetworkInput {
    /// Parses the JSON form of the input.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves keyed distances and builds a validated [`Network`].
    pub fn into_network(self) -> Result<Network, NetworkError> {
        let terminals: Vec<Terminal> = self.terminals.iter().map(Terminal::new).collect();
        let ships: Vec<Ship> = self.fleet.iter().flat_map(FleetEntry::expand).collect();

        let terminal_pos = positions(self.terminals.iter().map(String::as_str));
        let plant_pos = positions(self.plants.iter().map(PowerPlant::id));

        let mut tp: HashMap<(usize, usize), f64> = HashMap::new();
        for e in &self.terminal_plant {
            let i = lookup(&terminal_pos, "terminal", &e.from)?;
            let j = lookup(&plant_pos, "plant", &e.to)?;
            tp.insert((i, j), e.distance);
        }
        let mut pp: HashMap<(usize, usize), f64> = HashMap::new();
        for e in &self.plant_plant {
            let a = lookup(&plant_pos, "plant", &e.from)?;
            let b = lookup(&plant_pos, "plant", &e.to)?;
            pp.insert((a, b), e.distance);
        }

        let num_t = self.terminals.len();
        let num_p = self.plants.len();

        let mut terminal_plant = DistanceMatrix::new(num_t, num_p);
        for i in 0..num_t {
            for j in 0..num_p {
                let d = tp.get(&(i, j)).ok_or_else(|| NetworkError::MissingDistance {
                    from: self.terminals[i].clone(),
                    to: self.plants[j].id().to_string(),
                })?;
                terminal_plant.set(i, j, *d);
            }
        }

        let mut plant_plant = DistanceMatrix::square(num_p);
        for a in 0..num_p {
            for b in 0..num_p {
                if a == b {
                    continue;
                }
                let d = pp
                    .get(&(a, b))
                    .or_else(|| pp.get(&(b, a)))
                    .ok_or_else(|| NetworkError::MissingDistance {
                        from: self.plants[a].id().to_string(),
                        to: self.plants[b].id().to_string(),
                    })?;
                plant_plant.set(a, b, *d);
            }
        }

        Network::new(
            terminals,
            self.plants,
            ships,
            terminal_plant,
            plant_plant,
            self.params,
        )
    }
}

fn positions<'a>(ids: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, id) in ids.enumerate() {
        map.entry(id.to_string()).or_insert(idx);
    }
    map
}

fn lookup(
    map: &HashMap<String, usize>,
    kind: &'static str,
    id: &str,
) -> Result<usize, NetworkError> {
    map.get(id).copied().ok_or_else(|| NetworkError::UnknownNode {
        kind,
        id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NetworkInput {
        NetworkInput {
            terminals: vec!["Donggi".into()],
            plants: vec![
                PowerPlant::new("Ambon", 125.0, 273.91),
                PowerPlant::new("Seram", 53.02, 182.61),
            ],
            fleet: vec![
                FleetEntry {
                    class: ShipClass::Small,
                    name: None,
                    count: 2,
                    capacity: 2513.0,
                    speed: 24.076,
                    fuel_rate: 7.7,
                    gross_tonnage: 2930.0,
                    tug_rate: 30.02,
                },
                FleetEntry {
                    class: ShipClass::Large,
                    name: Some("Coral".into()),
                    count: 1,
                    capacity: 7500.0,
                    speed: 25.928,
                    fuel_rate: 20.5,
                    gross_tonnage: 7833.0,
                    tug_rate: 46.76,
                },
            ],
            terminal_plant: vec![
                DistanceEntry::new("Donggi", "Ambon", 877.85),
                DistanceEntry::new("Donggi", "Seram", 946.37),
            ],
            plant_plant: vec![DistanceEntry::new("Ambon", "Seram", 150.01)],
            params: OperatingParams::default(),
        }
    }

    #[test]
    fn test_expands_fleet() {
        let n = input().into_network().expect("valid");
        let ids: Vec<&str> = n.ships().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["Shinju_1", "Shinju_2", "Coral_1"]);
        assert_eq!(n.ships()[2].gross_tonnage(), 7833.0);
    }

    #[test]
    fn test_reverse_plant_distance() {
        let n = input().into_network().expect("valid");
        assert_eq!(n.plant_plant_distance(0, 1), 150.01);
        assert_eq!(n.plant_plant_distance(1, 0), 150.01);
        assert_eq!(n.plant_plant_distance(1, 1), 0.0);
    }

    #[test]
    fn test_missing_terminal_distance() {
        let mut i = input();
        i.terminal_plant.pop();
        assert_eq!(
            i.into_network().unwrap_err(),
            NetworkError::MissingDistance {
                from: "Donggi".into(),
                to: "Seram".into()
            }
        );
    }

    #[test]
    fn test_unknown_plant() {
        let mut i = input();
        i.plant_plant.push(DistanceEntry::new("Ambon", "Biak", 1335.29));
        assert!(matches!(
            i.into_network(),
            Err(NetworkError::UnknownNode { kind: "plant", .. })
        ));
    }

    #[test]
    fn test_duplicate_terminal_is_rejected() {
        let mut i = input();
        i.terminals.push("Donggi".into());
        i.terminal_plant.push(DistanceEntry::new("Donggi", "Ambon", 1.0));
        assert!(i.into_network().is_err());
    }

    #[test]
    fn test_from_json_error() {
        assert!(matches!(
            NetworkInput::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
