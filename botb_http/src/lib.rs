//! Blocking [`reqwest`]-based transport for the `botb` crate.
//!
//! [`HttpClient`] retries transient failures (network errors and gateway
//! errors) a bounded number of times with a fixed delay between attempts.
//! Definitive responses, including 4xx and most 5xx ones, are handed to the
//! API layer untouched; interpreting them is its job, not the transport's.

#![deny(
    bare_trait_objects,
    missing_debug_implementations,
    unknown_lints,
    unused_imports,
    unused_parens
)]

use botb::{ApiClient, Error, HttpResponse, Result};
use log::warn;
use reqwest::blocking::{Client, RequestBuilder};
use std::{thread, time::Duration};

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Gateway errors worth retrying. Plain 500s are excluded since parts of
/// the API use them to report missing objects.
const RETRY_STATUSES: [u16; 3] = [502, 503, 504];

/// An [`ApiClient`] backed by a blocking [`reqwest`] client.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client identifying itself with the given application name
    /// in its user agent.
    pub fn new(app_name: &str) -> Result<HttpClient> {
        let user_agent = format!(
            "{} (botb-rs {})",
            app_name,
            env!("CARGO_PKG_VERSION")
        );

        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|error| Error::network(error.to_string()))?;

        Ok(HttpClient { client })
    }

    fn execute(&self, request: impl Fn() -> RequestBuilder) -> Result<HttpResponse> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let outcome = request().send().and_then(|response| {
                let status = response.status().as_u16();

                response.text().map(|body| HttpResponse { status, body })
            });

            match outcome {
                Ok(response)
                    if RETRY_STATUSES.contains(&response.status) && attempt <= MAX_RETRIES =>
                {
                    warn!(
                        "Got status {}, retrying (attempt {} of {})",
                        response.status, attempt, MAX_RETRIES
                    );

                    thread::sleep(RETRY_DELAY);
                },
                Ok(response) => return Ok(response),
                Err(error) if attempt <= MAX_RETRIES => {
                    warn!("Request failed ({}), retrying (attempt {} of {})", error, attempt, MAX_RETRIES);

                    thread::sleep(RETRY_DELAY);
                },
                Err(error) => return Err(Error::network(error.to_string())),
            }
        }
    }
}

impl ApiClient for HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.execute(|| self.client.get(url))
    }

    fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<HttpResponse> {
        self.execute(|| self.client.post(url).form(fields))
    }
}
