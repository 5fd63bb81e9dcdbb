//! Coordinates and distance calculations.

pub mod coordinate;
pub mod queries;

pub use coordinate::Coordinate;
pub use queries::{geodesic_distance, haversine_distance};
