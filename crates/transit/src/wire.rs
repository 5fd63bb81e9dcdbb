//! JSON wire conventions of the routing service.
//!
//! Date-times are exchanged as naive local `YYYY-MM-DDTHH:MM:SS`. Client and
//! server agree on the time zone out of band.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Format used for every date-time sent to the service
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_date_time(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Parse a service date-time.
///
/// Fractional seconds are accepted, as is a missing seconds field. An offset
/// suffix is tolerated and dropped, keeping the wall-clock time.
pub fn parse_date_time(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|err| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").map_err(|_| err))
        .or_else(|err| {
            DateTime::parse_from_rfc3339(raw)
                .map(|value| value.naive_local())
                .map_err(|_| err)
        })
}

pub(crate) mod date_time {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date_time(&raw)
            .map_err(|err| serde::de::Error::custom(format!("invalid date-time '{raw}': {err}")))
    }
}

/// `null` or missing lists decode as empty
pub(crate) fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
