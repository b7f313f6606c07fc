//! Longitude coordinate spaces for a Pacific-centred map.
//!
//! The backend stores longitudes in (-180, 180] ("storage space"); the
//! map renders them shifted into [0, 360) ("display space") so the view
//! can centre on the Pacific without a seam at ±180°. The space a point
//! lives in is recorded in its type — [`GeoPoint`] is always storage,
//! [`DisplayPoint`] is always display — and conversion is explicit.
//!
//! 0 and 360 name the same meridian. `to_display` never returns 360.0
//! for a valid storage input; consumers comparing display longitudes
//! must treat the pair as equal.

use crate::error::GeoError;

/// Shift a storage longitude into display space [0, 360).
#[must_use]
pub fn to_display(lng: f64) -> f64 {
    if lng < 0.0 {
        lng + 360.0
    } else {
        lng
    }
}

/// Shift a display longitude back into storage space (-180, 180].
#[must_use]
pub fn to_storage(lng: f64) -> f64 {
    if lng > 180.0 {
        lng - 360.0
    } else {
        lng
    }
}

/// Normalize an arbitrary finite longitude into (-180, 180].
///
/// Repeated panning can leave a longitude many revolutions out of range.
/// The loop budget is derived from the input magnitude, so no finite
/// value can spin the loop forever; non-finite input is returned as-is
/// (callers validate with [`GeoPoint::new`]).
#[must_use]
pub fn normalize(lng: f64) -> f64 {
    if !lng.is_finite() {
        return lng;
    }
    // One spare turn on top of the revolutions the magnitude implies.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let budget = (lng.abs() / 360.0).ceil() as u64 + 1;
    let mut lng = lng;
    let mut turns = 0;
    while lng > 180.0 && turns < budget {
        lng -= 360.0;
        turns += 1;
    }
    while lng <= -180.0 && turns < budget {
        lng += 360.0;
        turns += 1;
    }
    lng
}

/// A point in storage space: latitude in [-90, 90], longitude in
/// (-180, 180]. This is the form the backend sends and receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Validate a latitude/longitude pair and normalize the longitude
    /// into storage space.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidCoordinate`] when the latitude is
    /// outside [-90, 90] or either component is non-finite.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidCoordinate {
                axis: "latitude",
                value: lat,
            });
        }
        if !lon.is_finite() {
            return Err(GeoError::InvalidCoordinate {
                axis: "longitude",
                value: lon,
            });
        }
        Ok(Self {
            lat,
            lon: normalize(lon),
        })
    }

    /// Convert to display space for rendering.
    #[must_use]
    pub fn to_display(self) -> DisplayPoint {
        DisplayPoint {
            lat: self.lat,
            lon: to_display(self.lon),
        }
    }
}

/// A point in display space: longitude in [0, 360). Used only for
/// rendering on the Pacific-centred map, never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    pub lat: f64,
    pub lon: f64,
}

impl DisplayPoint {
    /// Validate a map-click coordinate and bring the longitude into
    /// display space, normalizing first so inputs far outside one
    /// revolution (after repeated panning) are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidCoordinate`] when the latitude is
    /// outside [-90, 90] or either component is non-finite.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidCoordinate {
                axis: "latitude",
                value: lat,
            });
        }
        if !lon.is_finite() {
            return Err(GeoError::InvalidCoordinate {
                axis: "longitude",
                value: lon,
            });
        }
        Ok(Self {
            lat,
            lon: to_display(normalize(lon)),
        })
    }

    /// Convert back to storage space for transport.
    #[must_use]
    pub fn to_storage(self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lon: to_storage(self.lon),
        }
    }
}
