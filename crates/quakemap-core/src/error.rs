use thiserror::Error;

/// Errors from the coordinate and geometry layer.
#[derive(Debug, Error)]
pub enum GeoError {
    /// A latitude or longitude outside its valid range, or non-finite.
    #[error("invalid {axis}: {value}")]
    InvalidCoordinate { axis: &'static str, value: f64 },

    /// A vertex sequence that cannot describe a polygon boundary.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Errors while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set to a value that does not parse.
    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
