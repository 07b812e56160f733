//! Distance matrices.
//!
//! Provides the dense terminal→plant and plant→plant distance tables.

mod matrix;

pub use matrix::DistanceMatrix;
