//! Module containing the error type used throughout the library

use thiserror::Error;

/// Convenience alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by API operations.
///
/// "Not found" is deliberately not an error: single-object loads return
/// `Ok(None)` for missing objects, so the two variants here cleanly split
/// into "the caller asked for something the protocol cannot express" and
/// "the transport or the backend fell over". Higher layers that implement
/// retry logic should only ever retry [`Error::ConnectionFailure`].
#[derive(Debug, Error)]
pub enum Error {
    /// The query violates a precondition (descending order without a sort
    /// key, page length over the ceiling, empty list operand), or the
    /// backend rejected it as malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Transport-level failure: a non-success status, an unparsable response
    /// body, or a network error (in which case `status` is `None`).
    #[error("connection failure{}: {body}", fmt_status(.status))]
    ConnectionFailure {
        status: Option<u16>,
        body: String,
    },
}

impl Error {
    /// Shorthand for a [`Error::ConnectionFailure`] with a known HTTP status.
    pub fn http(status: u16, body: impl Into<String>) -> Error {
        Error::ConnectionFailure {
            status: Some(status),
            body: body.into(),
        }
    }

    /// Shorthand for a [`Error::ConnectionFailure`] without a status, i.e. a
    /// failure below the HTTP layer.
    pub fn network(message: impl Into<String>) -> Error {
        Error::ConnectionFailure {
            status: None,
            body: message.into(),
        }
    }
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!(" (status {})", status),
        None => String::new(),
    }
}
