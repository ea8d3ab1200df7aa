//! Shared helpers.

pub mod http_client;
pub mod time;

pub use http_client::{HttpFetch, StandardHttpClient, fetch_json};
