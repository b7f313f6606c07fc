use quakemap_core::GeoError;
use thiserror::Error;

/// Errors returned by the earthquake backend client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The base URL from configuration does not parse.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The geometry could not be encoded for the wire.
    #[error(transparent)]
    Geometry(#[from] GeoError),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
