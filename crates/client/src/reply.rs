use reqwest::StatusCode;

/// Outcome of a request that reached the service.
///
/// Separates "nothing matched" from "the service refused", which a plain
/// empty list cannot.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply<T> {
    /// Successful response with content
    Data(T),
    /// Successful response without content (an empty list)
    Empty,
    /// Non-success HTTP status; the body is discarded
    Rejected(StatusCode),
}

impl<T> Reply<T> {
    pub fn data(self) -> Option<T> {
        match self {
            Reply::Data(value) => Some(value),
            Reply::Empty | Reply::Rejected(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&T> {
        match self {
            Reply::Data(value) => Some(value),
            Reply::Empty | Reply::Rejected(_) => None,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Reply::Data(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Empty)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Reply::Rejected(_))
    }

    /// Status of a rejected request
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Reply::Rejected(status) => Some(*status),
            Reply::Data(_) | Reply::Empty => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Data(value) => Reply::Data(f(value)),
            Reply::Empty => Reply::Empty,
            Reply::Rejected(status) => Reply::Rejected(status),
        }
    }
}

impl<T: Default> Reply<T> {
    /// Fail-soft view: rejected and empty replies become the default value
    /// (an empty list, an all-false descriptor)
    pub fn unwrap_or_default(self) -> T {
        self.data().unwrap_or_default()
    }
}

impl<T> Reply<Vec<T>> {
    pub(crate) fn from_list(items: Vec<T>) -> Self {
        if items.is_empty() {
            Reply::Empty
        } else {
            Reply::Data(items)
        }
    }
}
