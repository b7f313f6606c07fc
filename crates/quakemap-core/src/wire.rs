//! Wire types for the earthquake search backend (HTTP+JSON).
//!
//! Shapes mirror the backend's response models exactly. Coordinates are
//! storage space on the wire in both directions. Numeric fields the
//! upstream feed did not provide arrive as `null` or are missing
//! entirely; both deserialize to `None`, never to zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A seismic event record as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarthquakeRecord {
    pub id: String,
    #[serde(default)]
    pub magnitude: Option<f64>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub depth: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    /// Distance from the search centre; present only on radius results.
    #[serde(default)]
    pub distance_km: Option<f64>,
}

/// Body for `POST /earthquakes/search/radius`. Storage-space coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiusSearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

/// Body for `POST /earthquakes/search/region`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSearchRequest {
    pub polygon_wkt: String,
}

/// Response from `GET /earthquakes/sync`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    pub message: String,
    #[serde(default)]
    pub total_received: Option<u64>,
}

/// Aggregate over one numeric column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValueStats {
    pub average: f64,
    pub maximum: f64,
    pub minimum: f64,
}

/// Response from `GET /earthquakes/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_earthquakes: u64,
    pub recent_24h: u64,
    pub magnitude_stats: ValueStats,
    pub depth_stats: ValueStats,
}

/// Response from `POST /earthquakes/boundary`: centroid, envelope and
/// convex hull of a set of events, as WKT strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryStatsResponse {
    pub total_count: u64,
    pub center_point: String,
    pub bounding_box: String,
    pub convex_hull: String,
    pub area_km2: f64,
}
