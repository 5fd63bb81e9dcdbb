//! Reachability rows derived from an isoline response.

use chrono::NaiveDateTime;
use naviqore_transit::{Coordinate, LegType, Stop, StopConnection, TimeType};

/// How one stop is reached, as seen from the query origin
#[derive(Clone, Debug, PartialEq)]
pub struct ReachRow {
    pub source_stop: String,
    pub target_stop: String,
    pub source_time: NaiveDateTime,
    pub target_time: NaiveDateTime,
    /// Whole minutes between the query time and `target_time`, unsigned
    pub minutes_from_start: i64,
    /// Metres from the origin stop to the target stop
    pub distance_from_origin: f64,
    pub leg_type: LegType,
    pub travel_mode: String,
}

impl ReachRow {
    fn new(
        source: &Stop,
        target: &Stop,
        source_time: NaiveDateTime,
        target_time: NaiveDateTime,
        query_time: NaiveDateTime,
        origin: &Coordinate,
        connection: &StopConnection,
    ) -> Self {
        let seconds = (target_time - query_time).num_seconds();
        Self {
            source_stop: source.name.clone(),
            target_stop: target.name.clone(),
            source_time,
            target_time,
            minutes_from_start: seconds.div_euclid(60).abs(),
            distance_from_origin: target.coordinate.distance_to(origin),
            leg_type: connection.connecting_leg.leg_type(),
            travel_mode: connection.connecting_leg.transport_description(),
        }
    }

    /// Metres still walkable within `max_minutes`, never negative
    pub fn walking_radius(&self, max_minutes: i64, metres_per_minute: f64) -> f64 {
        (max_minutes - self.minutes_from_start).max(0) as f64 * metres_per_minute
    }
}

/// One row per reached stop, closest in time first.
///
/// For departure queries each row ends at the connecting leg's destination
/// (earliest arrival there); for arrival queries it ends at the leg's origin
/// (latest departure from there). Legs missing either stop are skipped.
/// Platforms sharing a station name keep their own rows.
pub fn reachability_rows(
    reached: &[StopConnection],
    time_type: TimeType,
    query_time: NaiveDateTime,
    origin: &Coordinate,
) -> Vec<ReachRow> {
    let mut rows: Vec<ReachRow> = reached
        .iter()
        .filter_map(|connection| {
            let leg = &connection.connecting_leg;
            let (from, to) = (leg.from_stop()?, leg.to_stop()?);

            let row = match time_type {
                TimeType::Departure => ReachRow::new(
                    from,
                    to,
                    leg.departure_time,
                    leg.arrival_time,
                    query_time,
                    origin,
                    connection,
                ),
                TimeType::Arrival => ReachRow::new(
                    to,
                    from,
                    leg.arrival_time,
                    leg.departure_time,
                    query_time,
                    origin,
                    connection,
                ),
            };
            Some(row)
        })
        .collect();

    rows.sort_by_key(|row| row.minutes_from_start);
    rows
}
