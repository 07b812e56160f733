//! Solution interpretation.
//!
//! Turns a solved assignment into ship routes and a structured report. Reads
//! values only; the assignment is never modified.

mod report;
mod route;

pub use report::{
    ClassUsage, CostBreakdown, FleetTotals, PlantReport, Report, ShipReport, TierCheck,
};
pub use route::{Route, RouteKind, RouteReader, Stop};
