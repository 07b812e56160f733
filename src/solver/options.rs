//! Backend limits and tolerances.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Limits and tolerances passed to the backend.
///
/// # Examples
///
/// ```
/// use u_milkrun::solver::SolverOptions;
///
/// let o = SolverOptions::from_json(r#"{"time_limit_secs": 300}"#).unwrap();
/// assert_eq!(o.time_limit_secs, 300.0);
/// assert_eq!(o.mip_gap, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Wall-clock limit in seconds.
    pub time_limit_secs: f64,
    /// Iteration limit of the backend's main loop.
    pub iteration_limit: u64,
    /// Relative optimality gap at which the search stops.
    pub mip_gap: f64,
    /// Distance from an integer at which a value counts as integral.
    pub integer_tolerance: f64,
    /// Allowed constraint residual.
    pub constraint_tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            time_limit_secs: 1000.0,
            iteration_limit: 1000,
            mip_gap: 0.05,
            integer_tolerance: 1e-4,
            constraint_tolerance: 1e-5,
        }
    }
}

impl SolverOptions {
    /// Parses JSON options; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, secs: f64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Sets the relative gap.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = gap;
        self
    }

    /// Checks that limits are positive and tolerances non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_limit_secs.is_finite() || self.time_limit_secs <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "time_limit_secs",
                value: self.time_limit_secs,
            });
        }
        if self.iteration_limit == 0 {
            return Err(ConfigError::OutOfRange {
                name: "iteration_limit",
                value: 0.0,
            });
        }
        for (name, value) in [
            ("mip_gap", self.mip_gap),
            ("integer_tolerance", self.integer_tolerance),
            ("constraint_tolerance", self.constraint_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }
        Ok(())
    }
}
