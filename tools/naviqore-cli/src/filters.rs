//! Routing filter flags shared by the `connections` and `isolines` commands.

use clap::Args;
use naviqore_client::QueryConfig;
use naviqore_transit::{RouterInfo, TransportMode};
use tracing::warn;

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Maximum number of transfers (-1 for no limit)
    #[arg(long, allow_negative_numbers = true)]
    pub max_transfers: Option<i64>,

    /// Maximum travel time in minutes (-1 for no limit)
    #[arg(long, allow_negative_numbers = true)]
    pub max_travel_time: Option<i64>,

    /// Maximum walking duration in minutes (-1 for no limit)
    #[arg(long, allow_negative_numbers = true)]
    pub max_walking_duration: Option<i64>,

    /// Minimum transfer time in minutes (-1 for the service default)
    #[arg(long, allow_negative_numbers = true)]
    pub min_transfer_time: Option<i64>,

    /// Only wheelchair accessible trips
    #[arg(long)]
    pub wheelchair: bool,

    /// Only trips that allow bikes
    #[arg(long)]
    pub bikes: bool,

    /// Comma separated transport modes, e.g. BUS,TRAM
    #[arg(long, value_delimiter = ',')]
    pub modes: Vec<TransportMode>,
}

fn enabled(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

fn minutes_to_seconds(value: Option<i64>) -> Option<u32> {
    enabled(value).and_then(|minutes| minutes.checked_mul(60))
}

/// Keeps `value` only when the router understands the filter
fn supported<T>(value: Option<T>, supported: bool, flag: &str) -> Option<T> {
    match value {
        Some(_) if !supported => {
            warn!(flag, "router does not support this filter, ignoring it");
            None
        }
        other => other,
    }
}

impl FilterArgs {
    /// Translates the flags into query filters.
    ///
    /// Numeric limits are always sent. Wheelchair, bike and mode filters are
    /// dropped when the router does not advertise them.
    pub fn to_query_config(&self, router: &RouterInfo) -> QueryConfig {
        let modes = (!self.modes.is_empty()).then(|| self.modes.clone());
        let accessibility = self.wheelchair.then_some(true);
        let bikes = self.bikes.then_some(true);

        QueryConfig {
            max_num_transfers: enabled(self.max_transfers),
            max_travel_time: minutes_to_seconds(self.max_travel_time),
            max_walking_duration: minutes_to_seconds(self.max_walking_duration),
            min_transfer_duration: minutes_to_seconds(self.min_transfer_time),
            accessibility: supported(accessibility, router.supports_accessibility, "--wheelchair")
                .is_some(),
            bikes: supported(bikes, router.supports_bikes, "--bikes").is_some(),
            travel_modes: supported(modes, router.supports_travel_modes, "--modes"),
        }
    }

    /// Travel time limit in minutes, if one is set
    pub fn max_travel_minutes(&self) -> Option<i64> {
        self.max_travel_time.filter(|minutes| *minutes >= 0)
    }
}
