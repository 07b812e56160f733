//! Ship class and ship instance types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three ship tiers, ordered from smallest to largest.
///
/// The policy prefers `Small`, upgrades to `Mid` and then `Large` when a
/// smaller class would overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    /// Shinju class.
    #[serde(alias = "Shinju")]
    Small,
    /// WSD59 class.
    #[serde(alias = "WSD59")]
    Mid,
    /// Coral class.
    #[serde(alias = "Coral")]
    Large,
}

impl ShipClass {
    /// All classes in upgrade order.
    pub const ALL: [ShipClass; 3] = [ShipClass::Small, ShipClass::Mid, ShipClass::Large];

    /// The next larger class, if any.
    pub fn upgrade(self) -> Option<ShipClass> {
        match self {
            ShipClass::Small => Some(ShipClass::Mid),
            ShipClass::Mid => Some(ShipClass::Large),
            ShipClass::Large => None,
        }
    }

    /// Position in [`ShipClass::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Fleet name of the class.
    pub fn label(self) -> &'static str {
        match self {
            ShipClass::Small => "Shinju",
            ShipClass::Mid => "WSD59",
            ShipClass::Large => "Coral",
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single assignable ship from the fleet pool.
///
/// # Examples
///
/// ```
/// use u_milkrun::models::{Ship, ShipClass};
///
/// let s = Ship::new("Shinju_1", ShipClass::Small, 2513.0, 24.076)
///     .with_fuel_rate(7.7)
///     .with_gross_tonnage(2930.0)
///     .with_tug_rate(30.02);
/// assert_eq!(s.class(), ShipClass::Small);
/// assert_eq!(s.capacity(), 2513.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    id: String,
    class: ShipClass,
    capacity: f64,
    speed: f64,
    fuel_rate: f64,
    gross_tonnage: f64,
    tug_rate: f64,
}

impl Ship {
    /// Creates a ship with the given capacity and speed.
    ///
    /// Default: no fuel consumption, zero gross tonnage, free tug service.
    pub fn new(id: impl Into<String>, class: ShipClass, capacity: f64, speed: f64) -> Self {
        Self {
            id: id.into(),
            class,
            capacity,
            speed,
            fuel_rate: 0.0,
            gross_tonnage: 0.0,
            tug_rate: 0.0,
        }
    }

    /// Sets fuel consumption (tonnes per day).
    pub fn with_fuel_rate(mut self, rate: f64) -> Self {
        self.fuel_rate = rate;
        self
    }

    /// Sets gross tonnage.
    pub fn with_gross_tonnage(mut self, gt: f64) -> Self {
        self.gross_tonnage = gt;
        self
    }

    /// Sets tug service rate (cost per hour).
    pub fn with_tug_rate(mut self, rate: f64) -> Self {
        self.tug_rate = rate;
        self
    }

    /// Ship identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Ship tier.
    pub fn class(&self) -> ShipClass {
        self.class
    }

    /// Cargo capacity (volume).
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Average speed. Sea time is distance divided by this value.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Fuel consumption in tonnes per day.
    pub fn fuel_rate(&self) -> f64 {
        self.fuel_rate
    }

    /// Gross tonnage, the base of harbor and pilot fees.
    pub fn gross_tonnage(&self) -> f64 {
        self.gross_tonnage
    }

    /// Tug service cost per hour in port.
    pub fn tug_rate(&self) -> f64 {
        self.tug_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_new_defaults() {
        let s = Ship::new("Coral_1", ShipClass::Large, 7500.0, 25.928);
        assert_eq!(s.id(), "Coral_1");
        assert_eq!(s.speed(), 25.928);
        assert_eq!(s.fuel_rate(), 0.0);
        assert_eq!(s.gross_tonnage(), 0.0);
        assert_eq!(s.tug_rate(), 0.0);
    }

    #[test]
    fn test_ship_builder() {
        let s = Ship::new("WSD59_3", ShipClass::Mid, 5000.0, 25.928)
            .with_fuel_rate(16.5)
            .with_gross_tonnage(5832.0)
            .with_tug_rate(46.76);
        assert_eq!(s.fuel_rate(), 16.5);
        assert_eq!(s.gross_tonnage(), 5832.0);
        assert_eq!(s.tug_rate(), 46.76);
    }

    #[test]
    fn test_class_order_and_upgrade() {
        assert!(ShipClass::Small < ShipClass::Mid);
        assert!(ShipClass::Mid < ShipClass::Large);
        assert_eq!(ShipClass::Small.upgrade(), Some(ShipClass::Mid));
        assert_eq!(ShipClass::Mid.upgrade(), Some(ShipClass::Large));
        assert_eq!(ShipClass::Large.upgrade(), None);
        assert_eq!(ShipClass::Large.index(), 2);
    }

    #[test]
    fn test_class_serde_aliases() {
        let c: ShipClass = serde_json::from_str("\"WSD59\"").expect("alias");
        assert_eq!(c, ShipClass::Mid);
        let c: ShipClass = serde_json::from_str("\"Small\"").expect("variant");
        assert_eq!(c, ShipClass::Small);
        assert_eq!(ShipClass::Large.to_string(), "Coral");
    }
}
