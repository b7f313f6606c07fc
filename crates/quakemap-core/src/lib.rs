//! Domain core for the quakemap seismic-event explorer.
//!
//! Holds the pure layers every other crate builds on: longitude
//! coordinate spaces for a Pacific-centred map, polygon rings with
//! antimeridian repair, the WKT/JSON wire types shared with the search
//! backend, and environment-driven configuration.

pub mod antimeridian;
pub mod app_config;
pub mod config;
pub mod coord;
pub mod error;
pub mod wire;
pub mod wkt;

pub use antimeridian::{split_at_antimeridian, Ring, SplitResult};
pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use coord::{normalize, to_display, to_storage, DisplayPoint, GeoPoint};
pub use error::{ConfigError, GeoError};
pub use wire::{
    BoundaryStatsResponse, EarthquakeRecord, RadiusSearchRequest, RegionSearchRequest,
    StatsResponse, SyncResponse, ValueStats,
};
pub use wkt::{point_wkt, polygon_wkt};
