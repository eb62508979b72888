//! Module containing the trait implemented by HTTP backends

use crate::error::Result;

/// An HTTP transport the API layer issues its requests through.
///
/// Implementations only move bytes; they must return `Ok` for *any* response
/// the server produced, including 4xx and 5xx ones, and reserve `Err` for
/// failures below the HTTP layer (DNS, connect, timeout). All interpretation
/// of status codes and bodies happens in the API layer, which is what keeps
/// the "404 means `None`" and "400 with an RTFM body means the query was
/// bad" rules in exactly one place.
///
/// Transports are free to retry transient failures internally, as long as a
/// request is never retried after a response with a definitive status was
/// received.
pub trait ApiClient {
    /// Performs a GET request against the given URL.
    fn get(&self, url: &str) -> Result<HttpResponse>;

    /// Performs a POST request with the given urlencoded form fields as the
    /// body.
    fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<HttpResponse>;
}

/// A raw HTTP response, reduced to the two things the API layer looks at.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
