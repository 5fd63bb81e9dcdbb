/// Failures that prevent a request from producing a [`Reply`](crate::Reply).
///
/// A non-success HTTP status is not an error; it is reported as
/// [`Reply::Rejected`](crate::Reply::Rejected).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout or a broken response body
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not the JSON the service promised, or it described an
    /// impossible itinerary (e.g. a connection without legs)
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("could not create http client: {0}")]
    Http(#[from] reqwest::Error),
}
