use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use naviqore_client::{DepartureQuery, TransitClient, DEFAULT_LIMIT, DEFAULT_MAX_DISTANCE};
use naviqore_transit::wire::parse_date_time;
use naviqore_transit::Coordinate;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod filters;
mod isoline;
mod render;
mod suggest;

use commands::Timing;
use config::Config;
use filters::FilterArgs;

#[derive(Parser, Debug)]
#[command(
    name = "naviqore",
    author,
    version,
    about = "Query a Naviqore public transit routing service",
    long_about = "Searches stops, departures, connections and isolines on a Naviqore \
                  routing service.\n\n\
                  The service url is read from NAVIQORE_SERVICE_URL (or the older \
                  NAVIQORE_HOST_URL), either in the environment or in a .env file in \
                  the working directory. WALKING_SPEED (km/h, default 4) sets the pace \
                  used for isoline walking radii."
)]
struct Args {
    /// Routing service url, overrides the environment
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show router capabilities and schedule validity
    Info,

    /// Suggest stops for a search term
    Stops {
        term: String,

        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Stops closest to a coordinate
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,

        /// Search radius in metres
        #[arg(long, default_value_t = DEFAULT_MAX_DISTANCE)]
        max_distance: u32,
    },

    /// Next departures at a stop
    Departures {
        /// Stop identifier
        stop: String,

        /// Earliest departure, e.g. 2024-05-01T08:00
        #[arg(long, value_parser = parse_date_time)]
        at: Option<NaiveDateTime>,

        /// Latest departure
        #[arg(long, value_parser = parse_date_time)]
        until: Option<NaiveDateTime>,

        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Connections between two stops
    Connections {
        /// Source stop identifier
        from: String,

        /// Target stop identifier
        to: String,

        #[command(flatten)]
        timing: TimingArgs,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Stops reachable from (or, with --arrive, reaching) a stop
    Isolines {
        /// Source stop identifier
        from: String,

        #[command(flatten)]
        timing: TimingArgs,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(clap::Args, Debug)]
struct TimingArgs {
    /// Travel date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Travel time (HH:MM), defaults to now
    #[arg(long, value_parser = parse_time)]
    time: Option<NaiveTime>,

    /// Treat the time as the latest arrival instead of the earliest departure
    #[arg(long)]
    arrive: bool,
}

impl From<TimingArgs> for Timing {
    fn from(args: TimingArgs) -> Self {
        Self {
            date: args.date,
            time: args.time,
            arrive: args.arrive,
        }
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(raw, "%H:%M").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(layer).with(filter).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = Config::load(args.service_url).context("Failed to load configuration")?;
    info!(url = %config.service_url, "binding client to service");

    let client = TransitClient::builder(&config.service_url)
        .build()
        .context("Failed to create transit client")?;

    match args.command {
        Command::Info => commands::info(&client),
        Command::Stops { term, limit } => commands::stops(&client, &term, limit),
        Command::Nearest {
            lat,
            lon,
            limit,
            max_distance,
        } => commands::nearest(&client, Coordinate::new(lat, lon), limit, max_distance),
        Command::Departures {
            stop,
            at,
            until,
            limit,
        } => {
            let query = DepartureQuery {
                departure: at,
                limit,
                until,
            };
            commands::departures(&client, &stop, &query)
        }
        Command::Connections {
            from,
            to,
            timing,
            filters,
        } => commands::connections(&client, &from, &to, &timing.into(), &filters),
        Command::Isolines {
            from,
            timing,
            filters,
        } => commands::isolines(&client, &config, &from, &timing.into(), &filters),
    }
}
