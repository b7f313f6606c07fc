//! Well-Known Text encoding for the search backend.
//!
//! The backend feeds the polygon straight into PostGIS
//! (`ST_GeomFromText`), which expects `(longitude latitude)` axis order
//! and a closed ring: the first vertex repeated as the last. Longitudes
//! are storage space.

use crate::antimeridian::Ring;
use crate::coord::GeoPoint;
use crate::error::GeoError;

/// Encode a ring as a closed `POLYGON((lon lat, ...))` string.
///
/// # Errors
///
/// Returns [`GeoError::InvalidGeometry`] when the ring has fewer than 3
/// distinct vertices (the constructor only rules out *consecutive*
/// duplicates, so a degenerate back-and-forth ring can still reach
/// this point).
pub fn polygon_wkt(ring: &Ring) -> Result<String, GeoError> {
    let pts = ring.points();
    let distinct = distinct_count(pts);
    if distinct < 3 {
        return Err(GeoError::InvalidGeometry(format!(
            "polygon needs at least 3 distinct vertices, got {distinct}"
        )));
    }
    let mut parts: Vec<String> = pts.iter().map(vertex).collect();
    parts.push(vertex(&pts[0]));
    Ok(format!("POLYGON(({}))", parts.join(", ")))
}

/// Encode a single storage-space point as `POINT(lon lat)`.
#[must_use]
pub fn point_wkt(point: &GeoPoint) -> String {
    format!("POINT({} {})", point.lon, point.lat)
}

fn vertex(p: &GeoPoint) -> String {
    format!("{} {}", p.lon, p.lat)
}

fn distinct_count(pts: &[GeoPoint]) -> usize {
    let mut seen: Vec<GeoPoint> = Vec::with_capacity(pts.len());
    for p in pts {
        if !seen.contains(p) {
            seen.push(*p);
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn polygon_wkt_closes_the_ring() {
        let ring = Ring::new(vec![
            point(0.0, 10.0),
            point(5.0, 20.0),
            point(10.0, 10.0),
        ])
        .unwrap();
        let wkt = polygon_wkt(&ring).unwrap();
        assert_eq!(wkt, "POLYGON((10 0, 20 5, 10 10, 10 0))");
    }

    #[test]
    fn polygon_wkt_orders_longitude_first() {
        let ring = Ring::new(vec![
            point(37.5, 127.0),
            point(35.1, 129.0),
            point(33.4, 126.5),
        ])
        .unwrap();
        let wkt = polygon_wkt(&ring).unwrap();
        assert!(wkt.starts_with("POLYGON((127 37.5, "));
    }

    #[test]
    fn polygon_wkt_keeps_negative_storage_longitudes() {
        let ring = Ring::new(vec![
            point(0.0, -170.0),
            point(5.0, -175.0),
            point(10.0, -171.0),
        ])
        .unwrap();
        let wkt = polygon_wkt(&ring).unwrap();
        assert!(wkt.contains("-170 0"));
        assert!(wkt.contains("-175 5"));
    }

    #[test]
    fn polygon_wkt_rejects_degenerate_back_and_forth_ring() {
        // Four vertices but only two distinct positions.
        let a = point(0.0, 10.0);
        let b = point(5.0, 20.0);
        let ring = Ring::new(vec![a, b, a, b]).unwrap();
        assert!(polygon_wkt(&ring).is_err());
    }

    #[test]
    fn point_wkt_orders_longitude_first() {
        assert_eq!(point_wkt(&point(37.5, 127.0)), "POINT(127 37.5)");
    }
}
