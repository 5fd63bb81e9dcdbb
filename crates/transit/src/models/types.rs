//! Core enums and errors for transit data.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Kind of movement performed along a leg
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LegType {
    Walk,
    Route,
}

/// Whether a query time is the earliest departure or the latest arrival
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TimeType {
    #[default]
    Departure,
    Arrival,
}

/// Matching strategy for stop name autocompletion
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SearchType {
    Exact,
    #[default]
    Contains,
    StartsWith,
    EndsWith,
}

/// Transport modes known to the routing service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TransportMode {
    Bus,
    Tram,
    Rail,
    Ship,
    Subway,
    AerialLift,
    Funicular,
}

impl TransportMode {
    pub const ALL: [TransportMode; 7] = [
        Self::Bus,
        Self::Tram,
        Self::Rail,
        Self::Ship,
        Self::Subway,
        Self::AerialLift,
        Self::Funicular,
    ];
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitError {
    #[error("Connection must contain at least one leg")]
    EmptyConnection,

    #[error("Stop {stop} not found in trip towards {head_sign}")]
    StopNotInTrip {
        stop: StopIdentifier,
        head_sign: String,
    },

    #[error("Invalid leg: {0}")]
    InvalidLeg(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
