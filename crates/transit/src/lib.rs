//! # naviqore-transit
//!
//! Typed domain model for the Naviqore public transit routing service.
//!
//! ## Features
//!
//! - **Schedule entities**: stops, routes, trips, stop times and departures
//! - **Itineraries**: legs and connections with derived metrics (durations,
//!   distances, transfers, stops travelled)
//! - **Illegal states are unrepresentable**: a route leg always carries its
//!   trip and stops, a connection always has at least one leg
//! - **Wire decoding**: every entity deserializes from the service's JSON
//!
//! ## Example
//!
//! ```
//! use naviqore_transit::prelude::*;
//!
//! let json = r#"{
//!     "legs": [{
//!         "from": { "latitude": 47.378177, "longitude": 8.540192 },
//!         "to": { "latitude": 47.366669, "longitude": 8.545094 },
//!         "type": "WALK",
//!         "departureTime": "2024-05-01T08:00:00",
//!         "arrivalTime": "2024-05-01T08:18:00"
//!     }]
//! }"#;
//!
//! let connection: Connection = serde_json::from_str(json).unwrap();
//! assert_eq!(connection.duration(), 18 * 60);
//! assert_eq!(connection.num_transfers(), 0);
//! assert!(connection.first_route_leg().is_none());
//! ```

pub mod identifiers;
pub mod models;
pub mod spatial;
pub mod wire;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::*;
    pub use crate::spatial::Coordinate;
}

pub use prelude::*;
