//! Itineraries returned by the router and the metrics derived from them.
//!
//! A [`Connection`] is an ordered, non-empty chain of [`Leg`]s. Every metric
//! is computed on demand from the legs; nothing is cached or mutated.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::models::schedule::{Stop, Trip};
use crate::models::types::*;
use crate::spatial::Coordinate;
use crate::wire;

// ============================================================================
// Leg
// ============================================================================

/// What a leg carries besides its endpoints and times.
///
/// Walk legs may start or end at a stop but never carry a trip. Route legs
/// always know both stops and the trip they ride on.
#[derive(Clone, Debug, PartialEq)]
pub enum LegKind {
    Walk {
        from_stop: Option<Stop>,
        to_stop: Option<Stop>,
    },
    Route {
        from_stop: Stop,
        to_stop: Stop,
        trip: Trip,
    },
}

/// One segment of a connection
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "LegRecord")]
pub struct Leg {
    pub from: Coordinate,
    pub to: Coordinate,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub kind: LegKind,
}

impl Leg {
    pub fn leg_type(&self) -> LegType {
        match self.kind {
            LegKind::Walk { .. } => LegType::Walk,
            LegKind::Route { .. } => LegType::Route,
        }
    }

    pub fn is_walk(&self) -> bool {
        self.leg_type() == LegType::Walk
    }

    pub fn is_route(&self) -> bool {
        self.leg_type() == LegType::Route
    }

    pub fn from_stop(&self) -> Option<&Stop> {
        match &self.kind {
            LegKind::Walk { from_stop, .. } => from_stop.as_ref(),
            LegKind::Route { from_stop, .. } => Some(from_stop),
        }
    }

    pub fn to_stop(&self) -> Option<&Stop> {
        match &self.kind {
            LegKind::Walk { to_stop, .. } => to_stop.as_ref(),
            LegKind::Route { to_stop, .. } => Some(to_stop),
        }
    }

    pub fn trip(&self) -> Option<&Trip> {
        match &self.kind {
            LegKind::Walk { .. } => None,
            LegKind::Route { trip, .. } => Some(trip),
        }
    }

    /// Elapsed seconds from departure to arrival
    pub fn duration(&self) -> i64 {
        (self.arrival_time - self.departure_time).num_seconds()
    }

    /// Geodesic distance between the leg endpoints in meters
    pub fn distance(&self) -> f64 {
        self.from.distance_to(&self.to)
    }

    /// Number of stops travelled on a route leg, 0 for walks.
    ///
    /// Looks up the first stop time at the boarding stop, then the first stop
    /// time at the alighting stop from there on.
    pub fn num_stops(&self) -> Result<usize> {
        let LegKind::Route { from_stop, to_stop, trip } = &self.kind else {
            return Ok(0);
        };

        let not_found = |stop: &Stop| TransitError::StopNotInTrip {
            stop: stop.id.clone(),
            head_sign: trip.head_sign.clone(),
        };

        let from_index = trip
            .position_of(&from_stop.id, 0)
            .ok_or_else(|| not_found(from_stop))?;
        let to_index = trip
            .position_of(&to_stop.id, from_index)
            .ok_or_else(|| not_found(to_stop))?;

        Ok(to_index - from_index)
    }

    /// Human readable label such as "BUS: 31 - Hegibachplatz".
    ///
    /// Walk legs are labelled by their leg type.
    pub fn transport_description(&self) -> String {
        let Some(trip) = self.trip() else {
            return self.leg_type().to_string();
        };

        let route = &trip.route;
        let mut pieces: Vec<&str> = Vec::new();
        if !route.transport_mode.is_empty() {
            pieces.push(&route.transport_mode);
        }
        if !route.short_name.is_empty() {
            pieces.push(&route.short_name);
        } else if !route.name.is_empty() {
            pieces.push(&route.name);
        } else {
            pieces.push(route.id.as_str());
        }

        let description = pieces.join(": ");
        if trip.head_sign.is_empty() {
            description
        } else {
            format!("{} - {}", description, trip.head_sign)
        }
    }
}

/// Leg as it appears on the wire, before the ROUTE/WALK shape is checked
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegRecord {
    from: Coordinate,
    to: Coordinate,
    from_stop: Option<Stop>,
    to_stop: Option<Stop>,
    #[serde(rename = "type")]
    leg_type: LegType,
    #[serde(with = "wire::date_time")]
    departure_time: NaiveDateTime,
    #[serde(with = "wire::date_time")]
    arrival_time: NaiveDateTime,
    trip: Option<Trip>,
}

impl TryFrom<LegRecord> for Leg {
    type Error = TransitError;

    fn try_from(record: LegRecord) -> Result<Self> {
        let kind = match record.leg_type {
            LegType::Walk => LegKind::Walk {
                from_stop: record.from_stop,
                to_stop: record.to_stop,
            },
            LegType::Route => match (record.from_stop, record.to_stop, record.trip) {
                (Some(from_stop), Some(to_stop), Some(trip)) => LegKind::Route {
                    from_stop,
                    to_stop,
                    trip,
                },
                (_, _, None) => {
                    return Err(TransitError::InvalidLeg("route leg without trip".into()))
                }
                _ => {
                    return Err(TransitError::InvalidLeg(
                        "route leg without boarding or alighting stop".into(),
                    ))
                }
            },
        };

        Ok(Self {
            from: record.from,
            to: record.to,
            departure_time: record.departure_time,
            arrival_time: record.arrival_time,
            kind,
        })
    }
}

// ============================================================================
// Connection
// ============================================================================

/// A complete journey from a source to a target
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "ConnectionRecord")]
pub struct Connection {
    legs: Vec<Leg>,
}

#[derive(Deserialize)]
struct ConnectionRecord {
    legs: Vec<Leg>,
}

impl TryFrom<ConnectionRecord> for Connection {
    type Error = TransitError;

    fn try_from(record: ConnectionRecord) -> Result<Self> {
        Self::new(record.legs)
    }
}

impl Connection {
    /// Fails with [`TransitError::EmptyConnection`] when `legs` is empty
    pub fn new(legs: Vec<Leg>) -> Result<Self> {
        if legs.is_empty() {
            return Err(TransitError::EmptyConnection);
        }
        Ok(Self { legs })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn first_leg(&self) -> &Leg {
        &self.legs[0]
    }

    pub fn last_leg(&self) -> &Leg {
        &self.legs[self.legs.len() - 1]
    }

    pub fn route_legs(&self) -> impl DoubleEndedIterator<Item = &Leg> + '_ {
        self.legs.iter().filter(|leg| leg.is_route())
    }

    pub fn walk_legs(&self) -> impl Iterator<Item = &Leg> + '_ {
        self.legs.iter().filter(|leg| leg.is_walk())
    }

    pub fn first_route_leg(&self) -> Option<&Leg> {
        self.route_legs().next()
    }

    pub fn last_route_leg(&self) -> Option<&Leg> {
        self.route_legs().next_back()
    }

    /// Boarding stop of the first route leg
    pub fn first_stop(&self) -> Option<&Stop> {
        self.first_route_leg().and_then(Leg::from_stop)
    }

    /// Alighting stop of the last route leg
    pub fn last_stop(&self) -> Option<&Stop> {
        self.last_route_leg().and_then(Leg::to_stop)
    }

    /// Stop the journey starts at, which may differ from [`Self::first_stop`]
    /// when it opens with a walk
    pub fn from_stop(&self) -> Option<&Stop> {
        self.first_leg().from_stop()
    }

    pub fn to_stop(&self) -> Option<&Stop> {
        self.last_leg().to_stop()
    }

    pub fn from_coordinate(&self) -> Coordinate {
        self.first_leg().from
    }

    pub fn to_coordinate(&self) -> Coordinate {
        self.last_leg().to
    }

    pub fn departure_time(&self) -> NaiveDateTime {
        self.first_leg().departure_time
    }

    pub fn arrival_time(&self) -> NaiveDateTime {
        self.last_leg().arrival_time
    }

    /// Elapsed seconds from first departure to last arrival
    pub fn duration(&self) -> i64 {
        (self.arrival_time() - self.departure_time()).num_seconds()
    }

    /// Seconds spent moving, waiting time between legs excluded
    pub fn travel_duration(&self) -> i64 {
        self.legs.iter().map(Leg::duration).sum()
    }

    /// Metres covered by all legs. Distance sums fold from `0.0`, an empty
    /// `f64` sum is `-0.0`.
    pub fn travel_distance(&self) -> f64 {
        self.legs.iter().map(Leg::distance).fold(0.0, |total, d| total + d)
    }

    /// Straight-line distance between start and end of the journey
    pub fn bee_line_distance(&self) -> f64 {
        self.from_coordinate().distance_to(&self.to_coordinate())
    }

    pub fn walk_distance(&self) -> f64 {
        self.walk_legs().map(Leg::distance).fold(0.0, |total, d| total + d)
    }

    pub fn route_distance(&self) -> f64 {
        self.route_legs().map(Leg::distance).fold(0.0, |total, d| total + d)
    }

    pub fn walk_duration(&self) -> i64 {
        self.walk_legs().map(Leg::duration).sum()
    }

    pub fn route_duration(&self) -> i64 {
        self.route_legs().map(Leg::duration).sum()
    }

    /// Vehicle changes: one less than the number of route legs, walks in
    /// between included.
    pub fn num_transfers(&self) -> usize {
        self.route_legs().count().saturating_sub(1)
    }

    /// Vehicle changes at the very stop the previous vehicle arrived at
    pub fn num_same_station_transfers(&self) -> usize {
        self.legs
            .windows(2)
            .filter(|pair| match (&pair[0].kind, &pair[1].kind) {
                (LegKind::Route { to_stop, .. }, LegKind::Route { from_stop, .. }) => {
                    to_stop == from_stop
                }
                _ => false,
            })
            .count()
    }

    /// Stops travelled over all route legs
    pub fn num_stops(&self) -> Result<usize> {
        self.route_legs().map(Leg::num_stops).sum()
    }

    /// Whether the journey arrives on a later calendar day than it departs
    pub fn multi_date(&self) -> bool {
        self.departure_time().date() != self.arrival_time().date()
    }
}

// ============================================================================
// Isolines
// ============================================================================

/// A stop reached by an isoline query and the leg that reached it
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopConnection {
    pub stop: Stop,
    pub connecting_leg: Leg,
    /// Only present when full connections were requested
    #[serde(default)]
    pub connection: Option<Connection>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{RouteIdentifier, StopIdentifier};
    use crate::models::schedule::{Route, StopTime};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn time(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn stop(id: &str, latitude: f64) -> Stop {
        Stop {
            id: StopIdentifier::new(id),
            name: format!("Stop {id}"),
            coordinate: Coordinate::new(latitude, 8.5),
        }
    }

    /// Stops S1..=Sn heading north
    fn line_of_stops(n: usize) -> Vec<Stop> {
        (1..=n).map(|i| stop(&format!("S{i}"), 47.0 + i as f64 * 0.01)).collect()
    }

    fn trip(stops: &[&Stop]) -> Trip {
        Trip {
            head_sign: "Oerlikon".into(),
            route: Route {
                id: RouteIdentifier::new("r10"),
                name: "Tram 10".into(),
                short_name: "10".into(),
                transport_mode: "TRAM".into(),
            },
            stop_times: stops
                .iter()
                .map(|s| StopTime {
                    stop: (*s).clone(),
                    arrival_time: time(1, 8, 0),
                    departure_time: time(1, 8, 0),
                })
                .collect(),
        }
    }

    fn route_leg(from: &Stop, to: &Stop, departure: NaiveDateTime, arrival: NaiveDateTime) -> Leg {
        Leg {
            from: from.coordinate,
            to: to.coordinate,
            departure_time: departure,
            arrival_time: arrival,
            kind: LegKind::Route {
                from_stop: from.clone(),
                to_stop: to.clone(),
                trip: trip(&[from, to]),
            },
        }
    }

    fn walk_leg(from: &Stop, to: &Stop, departure: NaiveDateTime, arrival: NaiveDateTime) -> Leg {
        Leg {
            from: from.coordinate,
            to: to.coordinate,
            departure_time: departure,
            arrival_time: arrival,
            kind: LegKind::Walk {
                from_stop: Some(from.clone()),
                to_stop: Some(to.clone()),
            },
        }
    }

    #[test]
    fn test_empty_connection_rejected() {
        assert_eq!(Connection::new(vec![]), Err(TransitError::EmptyConnection));

        let decoded: std::result::Result<Connection, _> = serde_json::from_str(r#"{ "legs": [] }"#);
        assert!(decoded.is_err());
    }

    #[test]
    fn test_leg_duration_is_total_seconds() {
        let (a, b) = (stop("A", 47.0), stop("B", 47.1));
        let leg = route_leg(&a, &b, time(1, 8, 0), time(1, 10, 30));
        assert_eq!(leg.duration(), 9_000);

        // Past midnight, longer than a day
        let overnight = route_leg(&a, &b, time(1, 22, 0), time(3, 0, 30));
        assert_eq!(overnight.duration(), 26 * 3600 + 30 * 60);
    }

    #[test]
    fn test_leg_type_accessors() {
        let (a, b) = (stop("A", 47.0), stop("B", 47.1));
        let walk = walk_leg(&a, &b, time(1, 8, 0), time(1, 8, 5));
        let ride = route_leg(&a, &b, time(1, 8, 5), time(1, 8, 20));

        assert!(walk.is_walk() && !walk.is_route());
        assert!(ride.is_route() && !ride.is_walk());
        assert!(walk.trip().is_none());
        assert_eq!(ride.trip().map(|t| t.head_sign.as_str()), Some("Oerlikon"));
        assert_eq!(walk.num_stops(), Ok(0));
    }

    #[test]
    fn test_leg_num_stops() {
        let stops = line_of_stops(4);
        let leg = Leg {
            from: stops[1].coordinate,
            to: stops[3].coordinate,
            departure_time: time(1, 8, 0),
            arrival_time: time(1, 8, 10),
            kind: LegKind::Route {
                from_stop: stops[1].clone(),
                to_stop: stops[3].clone(),
                trip: trip(&stops.iter().collect::<Vec<_>>()),
            },
        };
        assert_eq!(leg.num_stops(), Ok(2));
    }

    #[test]
    fn test_leg_num_stops_missing_stop() {
        let stops = line_of_stops(3);
        let outsider = stop("X", 46.0);
        let leg = Leg {
            from: stops[0].coordinate,
            to: outsider.coordinate,
            departure_time: time(1, 8, 0),
            arrival_time: time(1, 8, 10),
            kind: LegKind::Route {
                from_stop: stops[0].clone(),
                to_stop: outsider.clone(),
                trip: trip(&stops.iter().collect::<Vec<_>>()),
            },
        };

        assert_eq!(
            leg.num_stops(),
            Err(TransitError::StopNotInTrip {
                stop: StopIdentifier::new("X"),
                head_sign: "Oerlikon".into(),
            })
        );
    }

    #[test]
    fn test_leg_num_stops_missing_boarding_stop() {
        let stops = line_of_stops(3);
        let outsider = stop("X", 46.0);
        let leg = Leg {
            from: outsider.coordinate,
            to: stops[2].coordinate,
            departure_time: time(1, 8, 0),
            arrival_time: time(1, 8, 10),
            kind: LegKind::Route {
                from_stop: outsider.clone(),
                to_stop: stops[2].clone(),
                trip: trip(&stops.iter().collect::<Vec<_>>()),
            },
        };

        assert_eq!(
            leg.num_stops(),
            Err(TransitError::StopNotInTrip {
                stop: StopIdentifier::new("X"),
                head_sign: "Oerlikon".into(),
            })
        );
    }

    #[test]
    fn test_leg_num_stops_alighting_before_boarding() {
        // S3 only appears before S2 in the trip, so it is never reached
        let (s1, s2, s3) = (stop("S1", 47.0), stop("S2", 47.01), stop("S3", 47.02));
        let leg = Leg {
            from: s2.coordinate,
            to: s3.coordinate,
            departure_time: time(1, 8, 0),
            arrival_time: time(1, 8, 10),
            kind: LegKind::Route {
                from_stop: s2.clone(),
                to_stop: s3.clone(),
                trip: trip(&[&s1, &s3, &s2]),
            },
        };
        assert!(leg.num_stops().is_err());
    }

    #[test]
    fn test_num_transfers() {
        let (a, b, c, d) = (stop("A", 47.0), stop("B", 47.1), stop("C", 47.2), stop("D", 47.3));

        let route_walk_route = Connection::new(vec![
            route_leg(&a, &b, time(1, 8, 0), time(1, 8, 20)),
            walk_leg(&b, &c, time(1, 8, 20), time(1, 8, 25)),
            route_leg(&c, &d, time(1, 8, 30), time(1, 9, 0)),
        ])
        .unwrap();
        assert_eq!(route_walk_route.num_transfers(), 1);

        let back_to_back = Connection::new(vec![
            route_leg(&a, &b, time(1, 8, 0), time(1, 8, 20)),
            route_leg(&b, &c, time(1, 8, 25), time(1, 8, 50)),
        ])
        .unwrap();
        assert_eq!(back_to_back.num_transfers(), 1);

        let single =
            Connection::new(vec![route_leg(&a, &b, time(1, 8, 0), time(1, 8, 20))]).unwrap();
        assert_eq!(single.num_transfers(), 0);

        let walk_only =
            Connection::new(vec![walk_leg(&a, &b, time(1, 8, 0), time(1, 8, 20))]).unwrap();
        assert_eq!(walk_only.num_transfers(), 0);
    }

    #[test]
    fn test_num_same_station_transfers() {
        let (a, b, c, d) = (stop("A", 47.0), stop("B", 47.1), stop("C", 47.2), stop("D", 47.3));

        let same_station = Connection::new(vec![
            route_leg(&a, &b, time(1, 8, 0), time(1, 8, 20)),
            route_leg(&b, &c, time(1, 8, 25), time(1, 8, 50)),
        ])
        .unwrap();
        assert_eq!(same_station.num_same_station_transfers(), 1);

        let walked = Connection::new(vec![
            route_leg(&a, &b, time(1, 8, 0), time(1, 8, 20)),
            walk_leg(&b, &c, time(1, 8, 20), time(1, 8, 25)),
            route_leg(&c, &d, time(1, 8, 30), time(1, 9, 0)),
        ])
        .unwrap();
        assert_eq!(walked.num_same_station_transfers(), 0);
    }

    #[test]
    fn test_first_and_last_route_legs() {
        let (a, b, c, d) = (stop("A", 47.0), stop("B", 47.1), stop("C", 47.2), stop("D", 47.3));
        let connection = Connection::new(vec![
            walk_leg(&a, &b, time(1, 7, 50), time(1, 8, 0)),
            route_leg(&b, &c, time(1, 8, 0), time(1, 8, 20)),
            walk_leg(&c, &d, time(1, 8, 20), time(1, 8, 30)),
        ])
        .unwrap();

        assert_eq!(connection.first_leg().departure_time, time(1, 7, 50));
        assert_eq!(connection.last_leg().arrival_time, time(1, 8, 30));
        assert_eq!(connection.first_stop(), Some(&b));
        assert_eq!(connection.last_stop(), Some(&c));
        assert_eq!(connection.from_stop(), Some(&a));
        assert_eq!(connection.to_stop(), Some(&d));
        assert_eq!(connection.duration(), 40 * 60);
        assert_eq!(connection.walk_duration(), 20 * 60);
        assert_eq!(connection.route_duration(), 20 * 60);
        assert_eq!(connection.travel_duration(), 40 * 60);
        assert_eq!(connection.num_stops(), Ok(1));

        let walk_only =
            Connection::new(vec![walk_leg(&a, &b, time(1, 8, 0), time(1, 8, 20))]).unwrap();
        assert!(walk_only.first_route_leg().is_none());
        assert!(walk_only.first_stop().is_none());
        assert!(walk_only.last_stop().is_none());
    }

    #[test]
    fn test_distances() {
        let (a, b, c) = (stop("A", 47.0), stop("B", 47.01), stop("C", 47.02));
        let connection = Connection::new(vec![
            route_leg(&a, &b, time(1, 8, 0), time(1, 8, 20)),
            walk_leg(&b, &c, time(1, 8, 20), time(1, 8, 30)),
        ])
        .unwrap();

        let walk = b.coordinate.distance_to(&c.coordinate);
        let ride = a.coordinate.distance_to(&b.coordinate);
        assert_relative_eq!(connection.walk_distance(), walk);
        assert_relative_eq!(connection.route_distance(), ride);
        assert_relative_eq!(connection.travel_distance(), walk + ride);
        // Collinear stops: the bee line equals the travelled distance
        assert_relative_eq!(connection.bee_line_distance(), walk + ride, max_relative = 1e-6);
    }

    #[test]
    fn test_distances_without_walks_are_positive_zero() {
        let (a, b, c) = (stop("A", 47.0), stop("B", 47.01), stop("C", 47.02));
        let connection = Connection::new(vec![
            route_leg(&a, &b, time(1, 8, 0), time(1, 8, 20)),
            route_leg(&b, &c, time(1, 8, 25), time(1, 8, 40)),
        ])
        .unwrap();

        assert_eq!(connection.walk_distance(), 0.0);
        assert!(connection.walk_distance().is_sign_positive());
        assert_eq!(format!("{:.1}", connection.walk_distance() / 1000.0), "0.0");
        assert_eq!(connection.walk_duration(), 0);
    }

    #[test]
    fn test_multi_date() {
        let (a, b) = (stop("A", 47.0), stop("B", 47.1));
        let same_day =
            Connection::new(vec![route_leg(&a, &b, time(1, 22, 0), time(1, 23, 59))]).unwrap();
        assert!(!same_day.multi_date());

        let overnight =
            Connection::new(vec![route_leg(&a, &b, time(1, 23, 30), time(2, 0, 15))]).unwrap();
        assert!(overnight.multi_date());
    }

    #[test]
    fn test_transport_description() {
        let (a, b) = (stop("A", 47.0), stop("B", 47.1));
        let ride = route_leg(&a, &b, time(1, 8, 0), time(1, 8, 20));
        assert_eq!(ride.transport_description(), "TRAM: 10 - Oerlikon");

        let walk = walk_leg(&a, &b, time(1, 8, 0), time(1, 8, 20));
        assert_eq!(walk.transport_description(), "WALK");
    }

    #[test]
    fn test_route_leg_without_trip_rejected() {
        let json = r#"{
            "from": { "latitude": 47.0, "longitude": 8.5 },
            "to": { "latitude": 47.1, "longitude": 8.5 },
            "fromStop": {
                "id": "A", "name": "A",
                "coordinates": { "latitude": 47.0, "longitude": 8.5 }
            },
            "toStop": {
                "id": "B", "name": "B",
                "coordinates": { "latitude": 47.1, "longitude": 8.5 }
            },
            "type": "ROUTE",
            "departureTime": "2024-05-01T08:00:00",
            "arrivalTime": "2024-05-01T08:20:00"
        }"#;
        let err = serde_json::from_str::<Leg>(json).unwrap_err();
        assert!(err.to_string().contains("route leg without trip"));
    }

    #[test]
    fn test_walk_leg_without_stops_decodes() {
        let json = r#"{
            "from": { "latitude": 47.0, "longitude": 8.5 },
            "to": { "latitude": 47.1, "longitude": 8.5 },
            "fromStop": null,
            "type": "WALK",
            "departureTime": "2024-05-01T08:00:00",
            "arrivalTime": "2024-05-01T08:20:00"
        }"#;
        let leg: Leg = serde_json::from_str(json).unwrap();
        assert!(leg.is_walk());
        assert!(leg.from_stop().is_none() && leg.to_stop().is_none());
        assert_eq!(leg.duration(), 1200);
    }
}
