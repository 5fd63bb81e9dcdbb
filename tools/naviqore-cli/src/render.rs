//! Plain-text summaries of connections.

use std::fmt::Write;

use chrono::NaiveDateTime;
use naviqore_transit::{Connection, Coordinate, Leg, Stop};

const TIME_FORMAT: &str = "%H:%M";
const DATE_FORMAT: &str = "%d.%m.%Y";

fn place(stop: Option<&Stop>, coordinate: Coordinate) -> String {
    match stop {
        Some(stop) => stop.name.clone(),
        None => coordinate.to_string(),
    }
}

fn clock(time: &NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Title line: the first ride, or the walk for connections without one
pub fn connection_header(connection: &Connection) -> String {
    if let Some(trip) = connection.first_route_leg().and_then(Leg::trip) {
        return format!("{} in direction {}", trip.route.short_name, trip.head_sign);
    }

    format!(
        "Walk from {} to {}",
        place(connection.from_stop(), connection.from_coordinate()),
        place(connection.to_stop(), connection.to_coordinate()),
    )
}

/// Labelled key figures in display order
pub fn connection_metrics(connection: &Connection) -> Vec<(&'static str, String)> {
    vec![
        ("Departure", clock(&connection.departure_time())),
        ("Arrival", clock(&connection.arrival_time())),
        ("Duration", format!("{} min", connection.duration() / 60)),
        ("Transfers", connection.num_transfers().to_string()),
        (
            "Walking distance",
            format!("{:.1} km", connection.walk_distance() / 1000.0),
        ),
    ]
}

fn leg_line(leg: &Leg) -> String {
    let middle = match leg.trip() {
        Some(trip) => format!("{} in direction {}", trip.route.short_name, trip.head_sign),
        None => format!(
            "{} min walk, {:.2} km",
            leg.duration() / 60,
            leg.distance() / 1000.0
        ),
    };

    format!(
        "{}  {}  ->  {}  {}  [{}]",
        clock(&leg.departure_time),
        place(leg.from_stop(), leg.from),
        clock(&leg.arrival_time),
        place(leg.to_stop(), leg.to),
        middle,
    )
}

/// One line per leg. Connections spanning several days get a date heading
/// up front and a divider whenever a leg arrives on a new day.
pub fn leg_lines(connection: &Connection) -> Vec<String> {
    let mut lines = Vec::with_capacity(connection.legs().len() + 2);
    let multi_date = connection.multi_date();
    let mut current_date = connection.departure_time().date();

    if multi_date {
        lines.push(current_date.format(DATE_FORMAT).to_string());
    }

    for leg in connection.legs() {
        let arrival_date = leg.arrival_time.date();
        if multi_date && arrival_date != current_date {
            current_date = arrival_date;
            lines.push(format!("-- {} --", current_date.format(DATE_FORMAT)));
        }
        lines.push(leg_line(leg));
    }

    lines
}

/// Header, metrics and legs as one block of text
pub fn render_connection(connection: &Connection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", connection_header(connection));

    let metrics: Vec<String> = connection_metrics(connection)
        .into_iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect();
    let _ = writeln!(out, "  {}", metrics.join(" | "));

    for line in leg_lines(connection) {
        let _ = writeln!(out, "    {line}");
    }

    out
}
