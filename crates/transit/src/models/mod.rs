//! Transit data models and types.

pub mod info;
pub mod journey;
pub mod schedule;
pub mod types;

// Re-exports for convenience
pub use info::{QueryFeatures, RouterInfo, ScheduleInfo, ScheduleValidity};
pub use journey::{Connection, Leg, LegKind, StopConnection};
pub use schedule::{Departure, DistanceToStop, Route, Stop, StopTime, Trip};
pub use types::{LegType, Result, SearchType, TimeType, TransitError, TransportMode};
