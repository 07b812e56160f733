//! Terminal and power plant types.

use serde::{Deserialize, Serialize};

/// An LNG loading terminal. Every trip starts and ends at a terminal.
///
/// # Examples
///
/// ```
/// use u_milkrun::models::Terminal;
///
/// let t = Terminal::new("Tangguh");
/// assert_eq!(t.id(), "Tangguh");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    id: String,
}

impl Terminal {
    /// Creates a terminal with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Terminal identifier.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A power plant receiving LNG deliveries.
///
/// Demand and storage capacity are daily figures; the per-period figures
/// used by the model are derived from the delivery-period length.
///
/// # Examples
///
/// ```
/// use u_milkrun::models::PowerPlant;
///
/// let p = PowerPlant::new("Sorong", 241.37, 456.52);
/// assert!((p.required_volume(7.0) - 1689.59).abs() < 1e-9);
/// assert!((p.max_tank(7.0) - 3195.64).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerPlant {
    id: String,
    demand: f64,
    storage_capacity: f64,
}

impl PowerPlant {
    /// Creates a plant with daily `demand` and daily-equivalent `storage_capacity`.
    pub fn new(id: impl Into<String>, demand: f64, storage_capacity: f64) -> Self {
        Self {
            id: id.into(),
            demand,
            storage_capacity,
        }
    }

    /// Plant identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// LNG demand per day.
    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Storage capacity in volume per day-equivalent.
    pub fn storage_capacity(&self) -> f64 {
        self.storage_capacity
    }

    /// Volume that must be delivered to cover one period of demand.
    pub fn required_volume(&self, period_days: f64) -> f64 {
        self.demand * period_days
    }

    /// Largest volume the plant can hold for one period.
    pub fn max_tank(&self, period_days: f64) -> f64 {
        self.storage_capacity * period_days
    }
}
