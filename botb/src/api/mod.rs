//! Module containing the building blocks of the API layer: the transport
//! trait, query construction and the pagination cursor.

pub mod client;
pub mod condition;
pub mod pagination;
pub mod query;

/// Root of the v1 REST API.
pub const BASE_URL: &str = "https://battleofthebits.com/api/v1";
