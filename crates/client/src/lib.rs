//! # naviqore-client
//!
//! Blocking HTTP client for the Naviqore public transit service: stop search,
//! departures, connection search and isolines, decoded into the
//! [`naviqore_transit`] domain model.
//!
//! Requests that reach the service yield a [`Reply`]; transport failures and
//! undecodable bodies are [`ClientError`]s.
//!
//! ```no_run
//! use naviqore_client::{ConnectionQuery, TransitClient};
//!
//! let client = TransitClient::builder("http://localhost:8080").build()?;
//! let connections = client
//!     .connections("8503000", "8507000", &ConnectionQuery::default())?
//!     .unwrap_or_default();
//!
//! for connection in &connections {
//!     println!("{} transfers", connection.num_transfers());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod error;
pub mod query;
mod reply;

pub use client::{TransitClient, TransitClientBuilder};
pub use error::{BuilderError, ClientError};
pub use query::{
    ConnectionQuery, DepartureQuery, IsolineQuery, QueryConfig, StopRef, DEFAULT_LIMIT,
    DEFAULT_MAX_DISTANCE,
};
pub use reply::Reply;

// Re-export the domain model
pub use naviqore_transit as transit;
