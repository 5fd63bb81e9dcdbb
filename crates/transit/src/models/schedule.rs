//! Schedule entities: stops, routes, trips and their stop times.

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::identifiers::*;
use crate::models::types::TransportMode;
use crate::spatial::Coordinate;
use crate::wire;

/// A boarding location
#[derive(Clone, Debug, Deserialize)]
pub struct Stop {
    pub id: StopIdentifier,
    pub name: String,
    #[serde(rename = "coordinates", alias = "coordinate")]
    pub coordinate: Coordinate,
}

/// Stops are the same stop when their identifiers match
impl PartialEq for Stop {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Stop {}

/// A transit route (e.g., "IC 1", "Tram 4")
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: RouteIdentifier,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    /// Raw mode as reported by the service
    #[serde(default)]
    pub transport_mode: String,
}

impl Route {
    /// Known transport mode, if the service sent one
    pub fn mode(&self) -> Option<TransportMode> {
        TransportMode::from_str(&self.transport_mode).ok()
    }
}

/// Arrival and departure of a trip at one stop
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTime {
    pub stop: Stop,
    #[serde(with = "wire::date_time")]
    pub arrival_time: NaiveDateTime,
    #[serde(with = "wire::date_time")]
    pub departure_time: NaiveDateTime,
}

/// A single vehicle run on a route
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Display name (e.g., "Zürich HB")
    #[serde(default)]
    pub head_sign: String,
    pub route: Route,
    /// Ordered by stop sequence; the service may omit them
    #[serde(default, deserialize_with = "wire::nullable_list")]
    pub stop_times: Vec<StopTime>,
}

impl Trip {
    /// Index of the first stop time at `stop`, searching from `start` onwards
    pub fn position_of(&self, stop: &StopIdentifier, start: usize) -> Option<usize> {
        self.stop_times
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, stop_time)| &stop_time.stop.id == stop)
            .map(|(index, _)| index)
    }
}

/// Next departure of a trip at a stop
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub stop_time: StopTime,
    pub trip: Trip,
}

/// A stop found near a coordinate
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DistanceToStop {
    pub stop: Stop,
    /// Meters
    pub distance: f64,
}
