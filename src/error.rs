//! Error types.
//!
//! Infeasible or time-limited solves are not errors; they are reported
//! through [`SolveStatus`](crate::solver::SolveStatus).

use thiserror::Error;

/// Invalid network data, rejected before any variable is declared.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("network has no {0}")]
    Empty(&'static str),

    #[error("duplicate {kind} identifier `{id}`")]
    DuplicateId { kind: &'static str, id: String },

    #[error("unknown {kind} `{id}` referenced by the input")]
    UnknownNode { kind: &'static str, id: String },

    #[error("distance {from} -> {to} must be finite and non-negative (got {value})")]
    InvalidDistance { from: String, to: String, value: f64 },

    #[error("{table} distance table is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    DistanceShape {
        table: &'static str,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("missing distance {from} -> {to}")]
    MissingDistance { from: String, to: String },

    #[error("ship `{ship}`: {field} must be finite and positive (got {value})")]
    NonPositiveShipValue {
        ship: String,
        field: &'static str,
        value: f64,
    },

    #[error("ship `{ship}`: {field} must be finite and non-negative (got {value})")]
    NegativeShipValue {
        ship: String,
        field: &'static str,
        value: f64,
    },

    #[error("plant `{plant}`: demand must be finite and non-negative (got {value})")]
    InvalidDemand { plant: String, value: f64 },

    #[error("plant `{plant}`: storage capacity must be finite and positive (got {value})")]
    InvalidStorage { plant: String, value: f64 },

    #[error("plant `{plant}`: demand {demand} exceeds storage capacity {storage}")]
    DemandExceedsStorage {
        plant: String,
        demand: f64,
        storage: f64,
    },

    #[error("operating parameter `{name}` is out of range (got {value})")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Invalid model configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("config value `{name}` is out of range (got {value})")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("buffer table is empty")]
    EmptyBufferTable,

    #[error("buffer table must be sorted by ascending period and end with an open bucket")]
    UnorderedBufferTable,

    #[error("failed to parse input: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Failure of the external solver, or a result that does not fit the model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("solver backend failed: {0}")]
    Backend(String),

    #[error("solver returned {got} values for a model with {expected} variables")]
    AssignmentSize { expected: usize, got: usize },

    #[error("solver reported {status} without a variable assignment")]
    MissingAssignment { status: &'static str },
}

/// A ship plan that cannot be turned into a variable assignment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("plan references {kind} index {index}, but the network has {len}")]
    OutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("ship `{0}` has more than one plan")]
    DuplicateShip(String),

    #[error("plan for ship `{0}` visits no plant")]
    EmptyRoute(String),

    #[error("plant `{0}` is visited more than once")]
    RepeatedPlant(String),
}

/// Any error raised while building or solving a milk-run model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}
