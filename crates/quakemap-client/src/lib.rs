//! HTTP client for the earthquake search backend.

pub mod client;
pub mod error;

pub use client::EarthquakeClient;
pub use error::ClientError;
