//! Network data model for milk-run routing.
//!
//! Terminals and power plants, the heterogeneous ship pool with its three
//! classes, scalar operating parameters, and the validated [`Network`] that
//! ties them together with the distance tables.

mod input;
mod network;
mod node;
mod params;
mod ship;

pub use input::{DistanceEntry, FleetEntry, NetworkInput};
pub use network::Network;
pub use node::{PowerPlant, Terminal};
pub use params::OperatingParams;
pub use ship::{Ship, ShipClass};
