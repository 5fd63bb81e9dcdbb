//! Request parameters and their query-string encoding.
//!
//! Absent optional parameters are left out of the query string entirely;
//! nothing is ever sent as a null marker.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use naviqore_transit::wire::format_date_time;
use naviqore_transit::{Stop, StopIdentifier, TimeType, TransportMode};

pub const DEFAULT_LIMIT: u32 = 10;
/// Meters
pub const DEFAULT_MAX_DISTANCE: u32 = 1000;

pub(crate) type QueryPairs = Vec<(&'static str, String)>;

// ============================================================================
// Stop references
// ============================================================================

/// A stop given either by identifier or as a decoded [`Stop`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StopRef<'a>(Cow<'a, str>);

impl StopRef<'_> {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for StopRef<'a> {
    fn from(id: &'a str) -> Self {
        Self(Cow::Borrowed(id))
    }
}

impl<'a> From<&'a String> for StopRef<'a> {
    fn from(id: &'a String) -> Self {
        Self(Cow::Borrowed(id))
    }
}

impl From<String> for StopRef<'static> {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

impl<'a> From<&'a StopIdentifier> for StopRef<'a> {
    fn from(id: &'a StopIdentifier) -> Self {
        Self(Cow::Borrowed(id.as_str()))
    }
}

impl<'a> From<&'a Stop> for StopRef<'a> {
    fn from(stop: &'a Stop) -> Self {
        Self(Cow::Borrowed(stop.id.as_str()))
    }
}

// ============================================================================
// Routing filters
// ============================================================================

/// Optional routing filters shared by connection and isoline queries
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryConfig {
    /// Seconds
    pub max_walking_duration: Option<u32>,
    pub max_num_transfers: Option<u32>,
    /// Seconds
    pub max_travel_time: Option<u32>,
    /// Seconds
    pub min_transfer_duration: Option<u32>,
    /// Only wheelchair accessible trips; sent only when set
    pub accessibility: bool,
    /// Only trips that allow bikes; sent only when set
    pub bikes: bool,
    /// `None` allows every mode
    pub travel_modes: Option<Vec<TransportMode>>,
}

impl QueryConfig {
    fn append_to(&self, pairs: &mut QueryPairs) {
        let numbers = [
            ("maxWalkingDuration", self.max_walking_duration),
            ("maxTransferNumber", self.max_num_transfers),
            ("maxTravelTime", self.max_travel_time),
            ("minTransferTime", self.min_transfer_duration),
        ];
        for (key, value) in numbers {
            if let Some(value) = value {
                pairs.push((key, value.to_string()));
            }
        }

        if self.accessibility {
            pairs.push(("wheelchairAccessible", "true".into()));
        }
        if self.bikes {
            pairs.push(("bikeAllowed", "true".into()));
        }
        if let Some(modes) = &self.travel_modes {
            let modes: Vec<&str> = modes.iter().map(|mode| mode.as_ref()).collect();
            pairs.push(("travelModes", modes.join(",")));
        }
    }
}

fn append_timing(
    pairs: &mut QueryPairs,
    time: Option<NaiveDateTime>,
    time_type: TimeType,
    now: NaiveDateTime,
) {
    pairs.push(("dateTime", format_date_time(&time.unwrap_or(now))));
    pairs.push(("timeType", time_type.as_ref().to_owned()));
}

// ============================================================================
// Queries
// ============================================================================

/// Parameters of a connection search
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionQuery {
    /// `None` means "now" on the local wall clock, read when the request is sent
    pub time: Option<NaiveDateTime>,
    pub time_type: TimeType,
    pub config: QueryConfig,
}

impl ConnectionQuery {
    pub fn departing_at(time: NaiveDateTime) -> Self {
        Self {
            time: Some(time),
            time_type: TimeType::Departure,
            ..Default::default()
        }
    }

    pub fn arriving_at(time: NaiveDateTime) -> Self {
        Self {
            time: Some(time),
            time_type: TimeType::Arrival,
            ..Default::default()
        }
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Timing and filter parameters, with `now` standing in for a missing time
    pub fn query_pairs(&self, now: NaiveDateTime) -> Vec<(&'static str, String)> {
        let mut pairs = QueryPairs::new();
        append_timing(&mut pairs, self.time, self.time_type, now);
        self.config.append_to(&mut pairs);
        pairs
    }
}

/// Parameters of an isoline computation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IsolineQuery {
    /// `None` means "now" on the local wall clock, read when the request is sent
    pub time: Option<NaiveDateTime>,
    pub time_type: TimeType,
    pub config: QueryConfig,
    /// Ask for the full connection to every reached stop
    pub return_connections: bool,
}

impl IsolineQuery {
    pub fn departing_at(time: NaiveDateTime) -> Self {
        Self {
            time: Some(time),
            ..Default::default()
        }
    }

    pub fn arriving_at(time: NaiveDateTime) -> Self {
        Self {
            time: Some(time),
            time_type: TimeType::Arrival,
            ..Default::default()
        }
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_connections(mut self) -> Self {
        self.return_connections = true;
        self
    }

    pub fn query_pairs(&self, now: NaiveDateTime) -> Vec<(&'static str, String)> {
        let mut pairs = QueryPairs::new();
        append_timing(&mut pairs, self.time, self.time_type, now);
        self.config.append_to(&mut pairs);
        if self.return_connections {
            pairs.push(("returnConnections", "true".into()));
        }
        pairs
    }
}

/// Parameters of a departure board request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepartureQuery {
    /// Left to the service when absent
    pub departure: Option<NaiveDateTime>,
    pub limit: u32,
    pub until: Option<NaiveDateTime>,
}

impl Default for DepartureQuery {
    fn default() -> Self {
        Self {
            departure: None,
            limit: DEFAULT_LIMIT,
            until: None,
        }
    }
}

impl DepartureQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if let Some(departure) = &self.departure {
            pairs.push(("departureDateTime", format_date_time(departure)));
        }
        if let Some(until) = &self.until {
            pairs.push(("untilDateTime", format_date_time(until)));
        }
        pairs
    }
}
