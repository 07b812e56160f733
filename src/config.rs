//! Policy configuration of the milk-run model.
//!
//! Every tunable constant of the tiered priority policy lives here rather
//! than in the constraint builders. The defaults reproduce the calibrated
//! policy; the buffer table in particular is empirical and only validated
//! for delivery periods of 7, 10, 15 and 20 days.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Adaptive tier-2 buffer fractions for one delivery-period bucket.
///
/// A bucket applies when the period is at most `max_period_days`; the last
/// bucket has no upper limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferBucket {
    /// Largest period covered; `None` for the open-ended bucket.
    pub max_period_days: Option<f64>,
    /// Fraction of total period demand added to the Mid-class allowance.
    pub mid: f64,
    /// Fraction of total period demand added to the Large-class allowance.
    pub large: f64,
}

impl BufferBucket {
    /// Bucket with the given limit and fractions.
    pub fn new(max_period_days: Option<f64>, mid: f64, large: f64) -> Self {
        Self {
            max_period_days,
            mid,
            large,
        }
    }
}

/// Daily charter rate as a quadratic function of ship capacity.
///
/// `rate(cap) = a·cap² + b·cap + c`, charged per day in service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentalCurve {
    /// Quadratic coefficient.
    pub a: f64,
    /// Linear coefficient.
    pub b: f64,
    /// Constant term.
    pub c: f64,
}

impl RentalCurve {
    /// Daily rate for a ship of the given capacity.
    pub fn daily_rate(&self, capacity: f64) -> f64 {
        self.a * capacity * capacity + self.b * capacity + self.c
    }
}

impl Default for RentalCurve {
    fn default() -> Self {
        Self {
            a: 1.178e-5,
            b: 1.549,
            c: 9.142e3,
        }
    }
}

/// Knobs of the constraint-and-priority model.
///
/// # Examples
///
/// ```
/// use u_milkrun::config::ModelConfig;
///
/// let config = ModelConfig::default();
/// assert_eq!(config.big_m, 50_000.0);
/// let bucket = config.buffer_for_period(10.0);
/// assert_eq!((bucket.mid, bucket.large), (0.60, 0.50));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Constant that switches conditional constraints off.
    pub big_m: f64,
    /// Objective weight per unit of capacity or time slack.
    pub slack_penalty: f64,
    /// Capacity slack allowed per ship as a fraction of its capacity.
    pub capacity_slack_fraction: f64,
    /// Half-width of the utilization band around 100% where both milk-run and
    /// split are feasible.
    pub split_band: f64,
    /// Nominal share of capacity attributed to the final plant→terminal leg.
    pub final_leg_fraction: f64,
    /// Minimum plants per milk-run trip.
    pub min_milk_run_plants: u32,
    /// Mid-class in-service capacity allowed per unit of Small capacity.
    pub mid_over_small_ratio: f64,
    /// Large-class in-service capacity allowed per unit of Mid capacity.
    pub large_over_mid_ratio: f64,
    /// Period-bucketed buffer fractions, ascending by period.
    pub buffer_table: Vec<BufferBucket>,
    /// Upper bound of each (terminal, ship) visit counter.
    pub max_terminal_visits: u32,
    /// Upper bound of each (plant, ship) visit counter.
    pub max_plant_visits: u32,
    /// Charter rate curve.
    pub rental: RentalCurve,
    /// Binary values above this read as set.
    pub binary_threshold: f64,
    /// Ships delivering at most this volume are treated as idle.
    pub active_volume_threshold: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            big_m: 50_000.0,
            slack_penalty: 500_000.0,
            capacity_slack_fraction: 0.01,
            split_band: 0.05,
            final_leg_fraction: 0.01,
            min_milk_run_plants: 2,
            mid_over_small_ratio: 1.5,
            large_over_mid_ratio: 1.2,
            buffer_table: vec![
                BufferBucket::new(Some(7.0), 0.61, 0.50),
                BufferBucket::new(Some(10.0), 0.60, 0.50),
                BufferBucket::new(Some(15.0), 0.60, 0.49),
                BufferBucket::new(None, 0.59, 0.47),
            ],
            max_terminal_visits: 5,
            max_plant_visits: 10,
            rental: RentalCurve::default(),
            binary_threshold: 0.5,
            active_volume_threshold: 0.1,
        }
    }
}

impl ModelConfig {
    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Buffer bucket for a delivery period of `period_days`.
    ///
    /// Falls back to the last bucket. The table is non-empty after
    /// [`validate`](Self::validate).
    pub fn buffer_for_period(&self, period_days: f64) -> BufferBucket {
        self.buffer_table
            .iter()
            .find(|b| b.max_period_days.map_or(true, |max| period_days <= max))
            .or_else(|| self.buffer_table.last())
            .cloned()
            .unwrap_or_else(|| BufferBucket::new(None, 0.0, 0.0))
    }

    /// Checks ranges and table ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("big_m", self.big_m),
            ("slack_penalty", self.slack_penalty),
            ("mid_over_small_ratio", self.mid_over_small_ratio),
            ("large_over_mid_ratio", self.large_over_mid_ratio),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }
        let fractions = [
            ("capacity_slack_fraction", self.capacity_slack_fraction),
            ("split_band", self.split_band),
            ("final_leg_fraction", self.final_leg_fraction),
            ("binary_threshold", self.binary_threshold),
        ];
        for (name, value) in fractions {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }
        if !self.active_volume_threshold.is_finite() || self.active_volume_threshold < 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "active_volume_threshold",
                value: self.active_volume_threshold,
            });
        }
        if self.min_milk_run_plants == 0 {
            return Err(ConfigError::OutOfRange {
                name: "min_milk_run_plants",
                value: 0.0,
            });
        }

        let table = &self.buffer_table;
        let Some(last) = table.last() else {
            return Err(ConfigError::EmptyBufferTable);
        };
        if last.max_period_days.is_some() {
            return Err(ConfigError::UnorderedBufferTable);
        }
        let mut prev = f64::NEG_INFINITY;
        for bucket in &table[..table.len() - 1] {
            match bucket.max_period_days {
                Some(max) if max > prev => prev = max,
                _ => return Err(ConfigError::UnorderedBufferTable),
            }
        }
        for bucket in table {
            for (name, value) in [("buffer.mid", bucket.mid), ("buffer.large", bucket.large)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::OutOfRange { name, value });
                }
            }
        }
        Ok(())
    }
}
