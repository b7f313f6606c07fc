//! Typed async client for the earthquake search backend.
//!
//! Wraps `reqwest` with backend-specific error handling and typed
//! response deserialization. Coordinates cross the wire in storage
//! space in both directions; polygon searches are encoded as WKT before
//! leaving this crate.

use std::time::Duration;

use reqwest::{Client, Url};

use quakemap_core::wkt::polygon_wkt;
use quakemap_core::{
    AppConfig, BoundaryStatsResponse, EarthquakeRecord, RadiusSearchRequest, RegionSearchRequest,
    Ring, StatsResponse, SyncResponse,
};

use crate::error::ClientError;

/// Client for the earthquake search backend.
///
/// Use [`EarthquakeClient::new`] with loaded configuration, or
/// [`EarthquakeClient::with_base_url`] to point at a mock server in
/// tests.
pub struct EarthquakeClient {
    client: Client,
    base_url: String,
}

impl EarthquakeClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with an explicit base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|_| ClientError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            base_url: trimmed.to_owned(),
        })
    }

    /// Fetches the event list, newest first.
    ///
    /// `min_magnitude` is an optional server-side filter.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on network failure or non-2xx status;
    /// [`ClientError::Deserialize`] on an unexpected response shape.
    pub async fn list(
        &self,
        limit: usize,
        min_magnitude: Option<f64>,
    ) -> Result<Vec<EarthquakeRecord>, ClientError> {
        self.fetch_record_list("earthquakes", limit, min_magnitude)
            .await
    }

    /// Fetches the most recent events; same shape as [`Self::list`].
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on network failure or non-2xx status;
    /// [`ClientError::Deserialize`] on an unexpected response shape.
    pub async fn recent(
        &self,
        limit: usize,
        min_magnitude: Option<f64>,
    ) -> Result<Vec<EarthquakeRecord>, ClientError> {
        self.fetch_record_list("earthquakes/recent", limit, min_magnitude)
            .await
    }

    /// Asks the backend to pull fresh data from its upstream feed.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on network failure or non-2xx status;
    /// [`ClientError::Deserialize`] on an unexpected response shape.
    pub async fn sync(&self) -> Result<SyncResponse, ClientError> {
        let url = format!("{}/earthquakes/sync", self.base_url);
        tracing::debug!(%url, "requesting upstream sync");
        let body = self.client.get(&url).send().await?.error_for_status()?;
        let text = body.text().await?;
        decode(&text, &url)
    }

    /// Searches for events within `radius_km` of a storage-space centre.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on network failure or non-2xx status;
    /// [`ClientError::Deserialize`] on an unexpected response shape.
    pub async fn search_radius(
        &self,
        request: &RadiusSearchRequest,
    ) -> Result<Vec<EarthquakeRecord>, ClientError> {
        let url = format!("{}/earthquakes/search/radius", self.base_url);
        tracing::debug!(
            lat = request.latitude,
            lon = request.longitude,
            radius_km = request.radius_km,
            "radius search"
        );
        let body = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        let text = body.text().await?;
        decode(&text, &url)
    }

    /// Searches for events inside a polygon ring.
    ///
    /// The ring is encoded as closed WKT in storage space; antimeridian
    /// repair is the caller's concern (a repaired split means one call
    /// per half).
    ///
    /// # Errors
    ///
    /// [`ClientError::Geometry`] if the ring has fewer than 3 distinct
    /// vertices; [`ClientError::Http`] / [`ClientError::Deserialize`] as
    /// for the other endpoints.
    pub async fn search_region(
        &self,
        ring: &Ring,
    ) -> Result<Vec<EarthquakeRecord>, ClientError> {
        let request = RegionSearchRequest {
            polygon_wkt: polygon_wkt(ring)?,
        };
        let url = format!("{}/earthquakes/search/region", self.base_url);
        tracing::debug!(vertices = ring.len(), "region search");
        let body = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let text = body.text().await?;
        decode(&text, &url)
    }

    /// Fetches aggregate statistics.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on network failure or non-2xx status;
    /// [`ClientError::Deserialize`] on an unexpected response shape.
    pub async fn stats(&self) -> Result<StatsResponse, ClientError> {
        let url = format!("{}/earthquakes/stats", self.base_url);
        let body = self.client.get(&url).send().await?.error_for_status()?;
        let text = body.text().await?;
        decode(&text, &url)
    }

    /// Computes boundary statistics (centroid, envelope, convex hull)
    /// for a set of event ids.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on network failure or non-2xx status;
    /// [`ClientError::Deserialize`] on an unexpected response shape.
    pub async fn boundary_stats(
        &self,
        earthquake_ids: &[String],
    ) -> Result<BoundaryStatsResponse, ClientError> {
        let url = format!("{}/earthquakes/boundary", self.base_url);
        tracing::debug!(count = earthquake_ids.len(), "boundary stats");
        let body = self
            .client
            .post(&url)
            .json(&earthquake_ids)
            .send()
            .await?
            .error_for_status()?;
        let text = body.text().await?;
        decode(&text, &url)
    }

    async fn fetch_record_list(
        &self,
        path: &str,
        limit: usize,
        min_magnitude: Option<f64>,
    ) -> Result<Vec<EarthquakeRecord>, ClientError> {
        let url = format!("{}/{path}", self.base_url);
        tracing::debug!(%url, limit, ?min_magnitude, "listing events");
        let mut request = self.client.get(&url).query(&[("limit", limit)]);
        if let Some(min_magnitude) = min_magnitude {
            request = request.query(&[("min_magnitude", min_magnitude)]);
        }
        let body = request.send().await?.error_for_status()?;
        let text = body.text().await?;
        decode(&text, &url)
    }
}

/// Parse a response body, keeping the request URL as error context.
fn decode<T: serde::de::DeserializeOwned>(text: &str, context: &str) -> Result<T, ClientError> {
    serde_json::from_str(text).map_err(|e| ClientError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
