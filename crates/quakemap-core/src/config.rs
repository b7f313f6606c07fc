use crate::app_config::AppConfig;
use crate::error::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading
/// env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable has an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in
/// the process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable has an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup.
///
/// The parsing/validation core is decoupled from the real environment so
/// tests can drive it with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be a positive finite number, got {value}"),
            });
        }
        Ok(value)
    };

    let api_base_url = or_default("QUAKEMAP_API_BASE_URL", "http://localhost:8000/api");
    let request_timeout_secs = parse_u64("QUAKEMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("QUAKEMAP_USER_AGENT", "quakemap/0.1 (seismic-explorer)");
    let log_level = or_default("QUAKEMAP_LOG_LEVEL", "info");
    let default_limit = parse_usize("QUAKEMAP_DEFAULT_LIMIT", "1000")?;
    let default_radius_km = parse_f64("QUAKEMAP_DEFAULT_RADIUS_KM", "1000")?;

    Ok(AppConfig {
        api_base_url,
        request_timeout_secs,
        user_agent,
        log_level,
        default_limit,
        default_radius_km,
    })
}
