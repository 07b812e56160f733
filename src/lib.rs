//! # u-milkrun
//!
//! LNG milk-run ship routing: a heterogeneous-fleet MINLP model that assigns
//! ships to multi-plant delivery trips under a tiered ship-class priority
//! policy, hands the model to an external solver, and reads routes back out
//! of the solution.
//!
//! ## Modules
//!
//! - [`models`] — Network data (Terminal, PowerPlant, Ship, ShipClass, Network)
//! - [`distance`] — Rectangular distance tables
//! - [`config`] — Policy knobs of the priority model
//! - [`formulation`] — Variables, expressions, constraints, Big-M rules
//! - [`milkrun`] — Decision variables, constraint stages, objective, warm start
//! - [`evaluation`] — Assignment checking against a model
//! - [`solver`] — External solver interface and results
//! - [`interpret`] — Route reconstruction and reporting
//! - [`error`] — Error types

pub mod config;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod formulation;
pub mod interpret;
pub mod milkrun;
pub mod models;
pub mod solver;
