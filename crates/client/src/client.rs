use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use naviqore_transit::{
    Connection, Coordinate, Departure, DistanceToStop, RouterInfo, ScheduleInfo, SearchType, Stop,
    StopConnection,
};
use reqwest::Url;
use reqwest::blocking;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::error::{BuilderError, ClientError};
use crate::query::{ConnectionQuery, DepartureQuery, IsolineQuery, StopRef};
use crate::reply::Reply;

/// Blocking client for the routing service.
///
/// Every call issues exactly one GET request and waits for it; there are no
/// retries and no caching.
pub struct TransitClient {
    url: Url,
    client: blocking::Client,
}

impl TransitClient {
    pub fn builder(url: impl Into<String>) -> TransitClientBuilder {
        TransitClientBuilder::new(url.into())
    }

    fn from_builder(builder: TransitClientBuilder) -> Result<Self, BuilderError> {
        let mut url = builder.url.trim();
        if let Some(without_trailing_slash) = url.strip_suffix('/') {
            url = without_trailing_slash;
        }

        if url.is_empty() {
            return Err(BuilderError::InvalidUrl("empty url".into()));
        }

        let url = Url::parse(url).map_err(|err| BuilderError::InvalidUrl(format!("{url}: {err}")))?;
        if url.cannot_be_a_base() {
            return Err(BuilderError::InvalidUrl(format!("{url} cannot be a base url")));
        }

        let mut client = blocking::Client::builder();
        if let Some(timeout) = builder.timeout {
            client = client.timeout(timeout);
        }

        debug!(%url, "binding client to service");

        Ok(Self {
            url,
            client: client.build()?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    // ---- Schedule ----

    /// Stops whose name matches `query`
    pub fn search_stops(
        &self,
        query: &str,
        limit: u32,
        search_type: SearchType,
    ) -> Result<Reply<Vec<Stop>>, ClientError> {
        let url = self.endpoint(
            &["schedule", "stops", "autocomplete"],
            &[
                ("query", query.to_owned()),
                ("limit", limit.to_string()),
                ("searchType", search_type.as_ref().to_owned()),
            ],
        );
        self.fetch_list(url)
    }

    /// Stops around `coordinate`, ordered by the service
    pub fn nearest_stops(
        &self,
        coordinate: &Coordinate,
        limit: u32,
        max_distance: u32,
    ) -> Result<Reply<Vec<DistanceToStop>>, ClientError> {
        let url = self.endpoint(
            &["schedule", "stops", "nearest"],
            &[
                ("latitude", coordinate.latitude.to_string()),
                ("longitude", coordinate.longitude.to_string()),
                ("limit", limit.to_string()),
                ("maxDistance", max_distance.to_string()),
            ],
        );
        self.fetch_list(url)
    }

    pub fn get_stop<'a>(&self, stop: impl Into<StopRef<'a>>) -> Result<Reply<Stop>, ClientError> {
        let stop = stop.into();
        let url = self.endpoint(&["schedule", "stops", stop.id()], &[]);
        self.fetch(url)
    }

    pub fn next_departures<'a>(
        &self,
        stop: impl Into<StopRef<'a>>,
        query: &DepartureQuery,
    ) -> Result<Reply<Vec<Departure>>, ClientError> {
        let stop = stop.into();
        let path = ["schedule", "stops", stop.id(), "departures"];
        let url = self.endpoint(&path, &query.query_pairs());
        self.fetch_list(url)
    }

    /// Validity range and contents of the loaded schedule
    pub fn schedule_info(&self) -> Result<Reply<ScheduleInfo>, ClientError> {
        let url = self.endpoint(&["schedule", ""], &[]);
        self.fetch(url)
    }

    // ---- Routing ----

    /// Connections between two stops, in the order the service returns them.
    ///
    /// Without an explicit time in `query`, the local wall clock at the moment
    /// of the call is used.
    pub fn connections<'a, 'b>(
        &self,
        from: impl Into<StopRef<'a>>,
        to: impl Into<StopRef<'b>>,
        query: &ConnectionQuery,
    ) -> Result<Reply<Vec<Connection>>, ClientError> {
        let (from, to) = (from.into(), to.into());
        let mut pairs = vec![
            ("sourceStopId", from.id().to_owned()),
            ("targetStopId", to.id().to_owned()),
        ];
        pairs.extend(query.query_pairs(Self::now_if_missing(query.time)));

        let url = self.endpoint(&["routing", "connections"], &pairs);
        self.fetch_list(url)
    }

    /// Every stop reachable from (or, for arrival queries, reaching) `from`.
    ///
    /// Without an explicit time in `query`, the local wall clock at the moment
    /// of the call is used.
    pub fn isolines<'a>(
        &self,
        from: impl Into<StopRef<'a>>,
        query: &IsolineQuery,
    ) -> Result<Reply<Vec<StopConnection>>, ClientError> {
        let from = from.into();
        let mut pairs = vec![("sourceStopId", from.id().to_owned())];
        pairs.extend(query.query_pairs(Self::now_if_missing(query.time)));

        let url = self.endpoint(&["routing", "isolines"], &pairs);
        self.fetch_list(url)
    }

    /// Filters the router supports
    pub fn router_info(&self) -> Result<Reply<RouterInfo>, ClientError> {
        let url = self.endpoint(&["routing", ""], &[]);
        self.fetch(url)
    }

    // ---- Plumbing ----

    fn now_if_missing(time: Option<NaiveDateTime>) -> NaiveDateTime {
        time.unwrap_or_else(|| {
            let now = Local::now().naive_local();
            debug!(%now, "no query time given, using local clock");
            now
        })
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.url.clone();
        // cannot-be-a-base urls are rejected by the builder
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<Reply<T>, ClientError> {
        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "service rejected request");
            return Ok(Reply::Rejected(status));
        }

        let body = response.bytes()?;
        let value = serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })?;

        Ok(Reply::Data(value))
    }

    fn fetch_list<T: DeserializeOwned>(&self, url: Url) -> Result<Reply<Vec<T>>, ClientError> {
        let reply = match self.fetch::<Vec<T>>(url)? {
            Reply::Data(items) => {
                trace!(count = items.len(), "decoded items");
                Reply::from_list(items)
            }
            other => other,
        };
        Ok(reply)
    }
}

pub struct TransitClientBuilder {
    url: String,
    timeout: Option<Duration>,
}

impl TransitClientBuilder {
    fn new(url: String) -> Self {
        Self { url, timeout: None }
    }

    /// Total time allowed per request; unset leaves the HTTP library default
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<TransitClient, BuilderError> {
        TransitClient::from_builder(self)
    }
}
