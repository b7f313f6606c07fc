/// Application configuration shared by the client and CLI.
///
/// All values have defaults; the map explorer should come up against a
/// local backend with no environment at all.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the earthquake search backend, including the `/api`
    /// prefix.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
    /// Default `limit` for event list queries.
    pub default_limit: usize,
    /// Default radius in kilometres for a radius search.
    pub default_radius_km: f64,
}
