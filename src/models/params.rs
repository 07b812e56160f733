//! Scalar operating parameters.

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

/// Port times, calendar and fee scalars shared by every ship.
///
/// The defaults describe a 7-day delivery period over 330 operational days.
///
/// # Examples
///
/// ```
/// use u_milkrun::models::OperatingParams;
///
/// let p = OperatingParams::default().with_period_days(10.0);
/// assert_eq!(p.period_hours(), 240.0);
/// assert!((p.periods_per_year() - 33.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingParams {
    /// Hours to load at a terminal.
    pub loading_hours: f64,
    /// Hours to unload at a plant.
    pub unloading_hours: f64,
    /// Port entry/exit hours per call.
    pub port_hours: f64,
    /// Operational days per year.
    pub operational_days: f64,
    /// Fuel price per tonne.
    pub fuel_price: f64,
    /// Harbor and mooring fee per gross ton per call.
    pub harbor_fee_per_gt: f64,
    /// Pilot (guide) fee per gross ton per call.
    pub pilot_fee_per_gt: f64,
    /// Fraction of each plant's maximum tank kept free as storage reserve.
    pub tank_reserve_fraction: f64,
    /// Length of one delivery period in days.
    pub period_days: f64,
}

impl Default for OperatingParams {
    fn default() -> Self {
        Self {
            loading_hours: 6.0,
            unloading_hours: 6.0,
            port_hours: 2.0,
            operational_days: 330.0,
            fuel_price: 448.0,
            harbor_fee_per_gt: 0.007,
            pilot_fee_per_gt: 0.0018,
            tank_reserve_fraction: 0.15,
            period_days: 7.0,
        }
    }
}

impl OperatingParams {
    /// Sets the delivery-period length in days.
    pub fn with_period_days(mut self, days: f64) -> Self {
        self.period_days = days;
        self
    }

    /// Delivery-period length in hours; the per-ship time budget.
    pub fn period_hours(&self) -> f64 {
        self.period_days * 24.0
    }

    /// How many delivery periods fit in the operational year.
    pub fn periods_per_year(&self) -> f64 {
        self.operational_days / self.period_days
    }

    /// Hours spent at a terminal per departure.
    pub fn terminal_call_hours(&self) -> f64 {
        self.port_hours + self.loading_hours
    }

    /// Hours spent at a plant per counted visit.
    pub fn plant_call_hours(&self) -> f64 {
        self.port_hours + self.unloading_hours
    }

    /// Hours billed for tug service per counted plant visit.
    pub fn tug_hours(&self) -> f64 {
        self.port_hours + self.loading_hours + self.unloading_hours
    }

    pub(crate) fn validate(&self) -> Result<(), NetworkError> {
        let non_negative = [
            ("loading_hours", self.loading_hours),
            ("unloading_hours", self.unloading_hours),
            ("port_hours", self.port_hours),
            ("fuel_price", self.fuel_price),
            ("harbor_fee_per_gt", self.harbor_fee_per_gt),
            ("pilot_fee_per_gt", self.pilot_fee_per_gt),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(NetworkError::InvalidParameter { name, value });
            }
        }
        for (name, value) in [
            ("operational_days", self.operational_days),
            ("period_days", self.period_days),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(NetworkError::InvalidParameter { name, value });
            }
        }
        let reserve = self.tank_reserve_fraction;
        if !(0.0..1.0).contains(&reserve) {
            return Err(NetworkError::InvalidParameter {
                name: "tank_reserve_fraction",
                value: reserve,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = OperatingParams::default();
        assert_eq!(p.period_hours(), 168.0);
        assert_eq!(p.terminal_call_hours(), 8.0);
        assert_eq!(p.plant_call_hours(), 8.0);
        assert_eq!(p.tug_hours(), 14.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_period() {
        let p = OperatingParams::default().with_period_days(0.0);
        assert_eq!(
            p.validate(),
            Err(NetworkError::InvalidParameter {
                name: "period_days",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_validate_rejects_full_reserve() {
        let p = OperatingParams {
            tank_reserve_fraction: 1.0,
            ..OperatingParams::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let p: OperatingParams = serde_json::from_str(r#"{"period_days": 15}"#).expect("parse");
        assert_eq!(p.period_days, 15.0);
        assert_eq!(p.fuel_price, 448.0);
    }
}
