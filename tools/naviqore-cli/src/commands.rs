use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use naviqore_client::{ConnectionQuery, DepartureQuery, IsolineQuery, Reply, TransitClient};
use naviqore_transit::{Coordinate, SearchType, TimeType};
use tracing::{info, warn};

use crate::config::Config;
use crate::filters::FilterArgs;
use crate::isoline::reachability_rows;
use crate::render::render_connection;
use crate::suggest::merge_suggestions;

/// Data of a reply, `None` when the service found nothing.
///
/// Rejections end the command; there is nothing sensible to print for them.
fn accepted<T>(reply: Reply<T>, what: &str) -> Result<Option<T>> {
    match reply {
        Reply::Data(data) => Ok(Some(data)),
        Reply::Empty => Ok(None),
        Reply::Rejected(status) => bail!("service rejected the {what} request ({status})"),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub fn info(client: &TransitClient) -> Result<()> {
    let router = client.router_info().context("Failed to fetch router info")?;
    if router.is_rejected() {
        warn!("router info unavailable, assuming no optional filters");
    }
    let router = router.unwrap_or_default();

    println!("Service: {}", client.url());
    println!("Filters:");
    println!("  max transfers:        {}", yes_no(router.supports_max_num_transfers));
    println!("  max travel time:      {}", yes_no(router.supports_max_travel_time));
    println!("  max walking duration: {}", yes_no(router.supports_max_walking_duration));
    println!("  min transfer time:    {}", yes_no(router.supports_min_transfer_duration));
    println!("  wheelchair:           {}", yes_no(router.supports_accessibility));
    println!("  bikes:                {}", yes_no(router.supports_bikes));
    println!("  travel modes:         {}", yes_no(router.supports_travel_modes));

    let schedule = client.schedule_info().context("Failed to fetch schedule info")?;
    match schedule.data().and_then(|info| info.schedule_validity) {
        Some(validity) => println!(
            "Schedule valid from {} to {}",
            validity.start_date, validity.end_date
        ),
        None => println!("Schedule validity unknown"),
    }

    Ok(())
}

pub fn stops(client: &TransitClient, term: &str, limit: u32) -> Result<()> {
    let starts_with = client
        .search_stops(term, limit, SearchType::StartsWith)
        .context("Failed to search stops")?
        .unwrap_or_default();

    // A failed substring search still leaves the prefix matches to show
    let contains = || match client.search_stops(term, limit, SearchType::Contains) {
        Ok(reply) => reply.unwrap_or_default(),
        Err(err) => {
            warn!(%err, "substring stop search failed");
            Vec::new()
        }
    };

    let suggestions = merge_suggestions(starts_with, contains, limit as usize);
    if suggestions.is_empty() {
        println!("No stops matching {term:?}");
    }
    for stop in suggestions {
        println!("{:<12} {}", stop.id.as_str(), stop.name);
    }

    Ok(())
}

pub fn nearest(
    client: &TransitClient,
    coordinate: Coordinate,
    limit: u32,
    max_distance: u32,
) -> Result<()> {
    let reply = client
        .nearest_stops(&coordinate, limit, max_distance)
        .context("Failed to fetch nearest stops")?;

    let Some(nearest) = accepted(reply, "nearest stops")? else {
        println!("No stops within {max_distance} m of {coordinate}");
        return Ok(());
    };

    for entry in nearest {
        println!("{:>6.0} m  {:<12} {}", entry.distance, entry.stop.id.as_str(), entry.stop.name);
    }

    Ok(())
}

pub fn departures(client: &TransitClient, stop: &str, query: &DepartureQuery) -> Result<()> {
    let reply = client
        .next_departures(stop, query)
        .context("Failed to fetch departures")?;

    let Some(departures) = accepted(reply, "departures")? else {
        println!("No departures from {stop}");
        return Ok(());
    };

    for departure in departures {
        let route = &departure.trip.route;
        let line = if route.short_name.is_empty() { &route.name } else { &route.short_name };
        println!(
            "{}  {:<6} {:<8} {}",
            departure.stop_time.departure_time.format("%H:%M"),
            route.transport_mode,
            line,
            departure.trip.head_sign
        );
    }

    Ok(())
}

/// Moves `date` into the schedule's validity range when the service reports one
fn clamp_to_schedule(client: &TransitClient, date: NaiveDate) -> Result<NaiveDate> {
    let schedule = client.schedule_info().context("Failed to fetch schedule info")?;

    if let Some(validity) = schedule.data().and_then(|info| info.schedule_validity) {
        if !validity.contains(date) {
            let clamped = validity.clamp(date);
            warn!(%date, %clamped, "date outside schedule validity, using nearest valid date");
            return Ok(clamped);
        }
    }

    Ok(date)
}

/// Query time from optional date and time flags, defaulting to now
fn travel_time(
    client: &TransitClient,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Result<NaiveDateTime> {
    let now = Local::now().naive_local();
    let date = clamp_to_schedule(client, date.unwrap_or(now.date()))?;
    Ok(date.and_time(time.unwrap_or(now.time())))
}

pub struct Timing {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub arrive: bool,
}

impl Timing {
    fn time_type(&self) -> TimeType {
        if self.arrive {
            TimeType::Arrival
        } else {
            TimeType::Departure
        }
    }
}

pub fn connections(
    client: &TransitClient,
    from: &str,
    to: &str,
    timing: &Timing,
    filters: &FilterArgs,
) -> Result<()> {
    let router = client.router_info().context("Failed to fetch router info")?.unwrap_or_default();

    let query = ConnectionQuery {
        time: Some(travel_time(client, timing.date, timing.time)?),
        time_type: timing.time_type(),
        config: filters.to_query_config(&router),
    };
    info!(from, to, time = ?query.time, time_type = %query.time_type, "searching connections");

    let reply = client
        .connections(from, to, &query)
        .context("Failed to fetch connections")?;

    let Some(connections) = accepted(reply, "connection")? else {
        println!("No connections found");
        return Ok(());
    };

    for connection in &connections {
        println!("{}", render_connection(connection));
    }

    Ok(())
}

pub fn isolines(
    client: &TransitClient,
    config: &Config,
    from: &str,
    timing: &Timing,
    filters: &FilterArgs,
) -> Result<()> {
    let router = client.router_info().context("Failed to fetch router info")?.unwrap_or_default();

    let source = client.get_stop(from).context("Failed to fetch source stop")?;
    let Some(source) = accepted(source, "stop")? else {
        bail!("unknown stop {from}");
    };

    let query_time = travel_time(client, timing.date, timing.time)?;
    let query = IsolineQuery {
        time: Some(query_time),
        time_type: timing.time_type(),
        config: filters.to_query_config(&router),
        return_connections: false,
    };
    info!(from, time = %query_time, time_type = %query.time_type, "computing isolines");

    let reply = client.isolines(&source, &query).context("Failed to fetch isolines")?;
    let Some(reached) = accepted(reply, "isoline")? else {
        println!("No stops reachable from {}", source.name);
        return Ok(());
    };

    let rows = reachability_rows(&reached, query.time_type, query_time, &source.coordinate);
    let max_minutes = filters.max_travel_minutes();
    let speed = config.walking_speed_m_per_min();

    for row in rows {
        let mut line = format!(
            "{:>4} min  {:>7.0} m  {:<5}  {}  <- {}  [{}]",
            row.minutes_from_start,
            row.distance_from_origin,
            row.leg_type.as_ref(),
            row.target_stop,
            row.source_stop,
            row.travel_mode
        );
        if let Some(max) = max_minutes {
            line.push_str(&format!("  walk radius {:.0} m", row.walking_radius(max, speed)));
        }
        println!("{line}");
    }

    Ok(())
}
