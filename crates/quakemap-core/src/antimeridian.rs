//! Antimeridian detection and repair for hand-drawn polygon rings.
//!
//! A ring drawn across the ±180° seam looks fine on the Pacific-centred
//! map but is degenerate in storage space: adjacent vertices appear to
//! jump most of the way around the planet. Exact seam clipping needs
//! intersection computation; this module instead uses a cheap repair
//! that is correct for a simple ring crossing the seam once and
//! degrades to "no worse than the original" otherwise. Rings that cross
//! the seam more than once are handled best-effort — a known limitation.

use crate::coord::{to_display, to_storage, GeoPoint};
use crate::error::GeoError;

/// A closed polygon boundary: at least 3 storage-space vertices in
/// drawing order, the last implicitly connected back to the first.
///
/// The constructor rejects duplicate consecutive vertices, including a
/// last vertex equal to the first (the closing edge would be
/// zero-length).
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<GeoPoint>,
}

impl Ring {
    /// Build a ring from vertices in drawing order.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidGeometry`] for fewer than 3 vertices
    /// or any duplicate consecutive pair.
    pub fn new(points: Vec<GeoPoint>) -> Result<Self, GeoError> {
        if points.len() < 3 {
            return Err(GeoError::InvalidGeometry(format!(
                "ring needs at least 3 vertices, got {}",
                points.len()
            )));
        }
        let closing_dup = points.first() == points.last();
        if closing_dup || points.windows(2).any(|w| w[0] == w[1]) {
            return Err(GeoError::InvalidGeometry(
                "duplicate consecutive vertex".to_string(),
            ));
        }
        Ok(Self { points })
    }

    /// Vertices in drawing order, storage space.
    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Outcome of antimeridian repair. Never empty and never more than two
/// rings: when splitting would leave both halves under 3 vertices the
/// original ring is returned unchanged, so there is always geometry to
/// search against.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitResult {
    /// The ring is usable as a single shape (possibly with remapped
    /// longitudes).
    Unchanged(Ring),
    /// The ring straddled the seam; eastern and western halves.
    Split(Ring, Ring),
}

impl SplitResult {
    /// The resulting rings, for callers issuing one search per ring.
    #[must_use]
    pub fn rings(&self) -> Vec<&Ring> {
        match self {
            SplitResult::Unchanged(ring) => vec![ring],
            SplitResult::Split(east, west) => vec![east, west],
        }
    }
}

/// Detect whether `ring` crosses the antimeridian and repair it.
///
/// Steps: flag the ring when its longitude range exceeds 180° or any
/// adjacent pair (including last→first) jumps more than 180°; remap all
/// longitudes into display space and re-check; if the jump disappeared
/// the remapped ring is one contiguous shape and is returned
/// `Unchanged` after converting each vertex back to storage space;
/// otherwise vertices are grouped by the sign of their original storage
/// longitude, preserving drawing order, and each group of at least 3
/// becomes a ring.
#[must_use]
pub fn split_at_antimeridian(ring: &Ring) -> SplitResult {
    let lngs: Vec<f64> = ring.points().iter().map(|p| p.lon).collect();
    if !crosses_antimeridian(&lngs) {
        return SplitResult::Unchanged(ring.clone());
    }

    let display: Vec<f64> = lngs.iter().copied().map(to_display).collect();
    if !has_adjacent_jump(&display) {
        // Contiguous on the Pacific-centred map: the seam crossing was
        // an artifact of storage-space wrapping, not a real split.
        let repaired = ring
            .points()
            .iter()
            .zip(&display)
            .map(|(p, &lng)| GeoPoint {
                lat: p.lat,
                lon: to_storage(lng),
            })
            .collect();
        return SplitResult::Unchanged(Ring { points: repaired });
    }

    // Jump persists after the remap: split by the sign of the original
    // storage longitude, keeping drawing order within each group.
    let mut east = Vec::new();
    let mut west = Vec::new();
    for p in ring.points() {
        if p.lon > 0.0 {
            east.push(*p);
        } else {
            west.push(*p);
        }
    }

    // Regrouping can surface duplicates that were non-adjacent in the
    // original ring, so candidates go back through the constructor and
    // are dropped if they no longer form a valid ring.
    let east = Ring::new(east).ok();
    let west = Ring::new(west).ok();
    match (east, west) {
        (Some(east), Some(west)) => SplitResult::Split(east, west),
        (Some(only), None) | (None, Some(only)) => SplitResult::Unchanged(only),
        (None, None) => SplitResult::Unchanged(ring.clone()),
    }
}

fn has_adjacent_jump(lngs: &[f64]) -> bool {
    (0..lngs.len()).any(|i| {
        let next = lngs[(i + 1) % lngs.len()];
        (next - lngs[i]).abs() > 180.0
    })
}

fn crosses_antimeridian(lngs: &[f64]) -> bool {
    let min = lngs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = lngs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    max - min > 180.0 || has_adjacent_jump(lngs)
}
