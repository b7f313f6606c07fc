//! Search-mode state machine.
//!
//! The controller is synchronous: it issues search *descriptions*
//! (ticket plus request geometry) and the caller performs the network
//! call, feeding the outcome back through `apply_*`. A ticket is valid
//! only while it is the latest outstanding request of its kind, so a
//! slow response from a superseded search is discarded instead of
//! clobbering newer state.

use std::fmt;

use quakemap_core::{
    split_at_antimeridian, DisplayPoint, EarthquakeRecord, GeoPoint, RadiusSearchRequest, Ring,
    SplitResult,
};

use crate::error::ViewError;
use crate::marker::{MapWidget, MarkerId, MarkerKind, MarkerSetName, MarkerSets};

/// Interaction mode of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Free browsing; clicks stage a radius-search centre.
    Idle,
    /// A radius search is in flight.
    RadiusPending,
    /// Radius results are displayed; coordinate inputs are locked.
    RadiusActive,
    /// Clicks add polygon vertices; also the posture while a polygon
    /// search is in flight.
    PolygonDrawing,
    /// Polygon results are displayed alongside the drawn ring.
    PolygonActive,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMode::Idle => "idle",
            SearchMode::RadiusPending => "radius search pending",
            SearchMode::RadiusActive => "radius search active",
            SearchMode::PolygonDrawing => "polygon drawing",
            SearchMode::PolygonActive => "polygon search active",
        };
        f.write_str(name)
    }
}

/// Identifies one issued search. A response is applied only if its
/// ticket is still the latest of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// A radius search ready to be sent by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusSearch {
    pub ticket: SearchTicket,
    pub request: RadiusSearchRequest,
}

/// A polygon search ready to be sent by the caller.
///
/// `geometry` may hold two rings when the drawn polygon straddled the
/// antimeridian; the caller issues one request per ring and merges the
/// results before applying them.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonSearch {
    pub ticket: SearchTicket,
    pub geometry: SplitResult,
}

/// How a fed-back response was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Results were rendered and the mode advanced.
    Applied,
    /// The search failed; the machine reverted to its pre-submission
    /// mode.
    Failed,
    /// The ticket was superseded; the response was discarded.
    Stale,
}

#[derive(Debug)]
struct PendingRadius {
    ticket: SearchTicket,
    revert: SearchMode,
    center: GeoPoint,
    radius_km: f64,
}

/// Drives a [`MapWidget`] through the radius/polygon search lifecycle.
pub struct SearchController<W: MapWidget> {
    widget: W,
    markers: MarkerSets,
    mode: SearchMode,
    staged_center: Option<GeoPoint>,
    radius_km: f64,
    draft: Vec<GeoPoint>,
    preview: Option<MarkerId>,
    pending_radius: Option<PendingRadius>,
    pending_polygon: Option<SearchTicket>,
    next_ticket: u64,
}

impl<W: MapWidget> SearchController<W> {
    /// # Errors
    ///
    /// Rejects a non-positive or non-finite default radius.
    pub fn new(widget: W, default_radius_km: f64) -> Result<Self, ViewError> {
        validate_radius(default_radius_km)?;
        Ok(Self {
            widget,
            markers: MarkerSets::new(),
            mode: SearchMode::Idle,
            staged_center: None,
            radius_km: default_radius_km,
            draft: Vec::new(),
            preview: None,
            pending_radius: None,
            pending_polygon: None,
            next_ticket: 0,
        })
    }

    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Coordinate inputs are locked while a radius search is pending or
    /// its results are displayed.
    #[must_use]
    pub fn inputs_locked(&self) -> bool {
        matches!(self.mode, SearchMode::RadiusPending | SearchMode::RadiusActive)
    }

    #[must_use]
    pub fn staged_center(&self) -> Option<GeoPoint> {
        self.staged_center
    }

    #[must_use]
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    #[must_use]
    pub fn polygon_vertex_count(&self) -> usize {
        self.draft.len()
    }

    #[must_use]
    pub fn markers(&self) -> &MarkerSets {
        &self.markers
    }

    #[must_use]
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Routes a map click by mode: a vertex while drawing, a staged
    /// radius centre otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Geometry`] for a non-finite coordinate or a
    /// latitude outside [-90, 90].
    pub fn map_click(&mut self, lat: f64, display_lng: f64) -> Result<(), ViewError> {
        if self.mode == SearchMode::PolygonDrawing {
            self.add_polygon_vertex(lat, display_lng)
        } else {
            self.stage_radius_center(lat, display_lng)
        }
    }

    /// Stages a radius-search centre from a display-space click.
    ///
    /// Clicking outside drawing mode while polygon results are shown
    /// leaves polygon mode first, so polygon and radius markers are
    /// never on the map together.
    ///
    /// # Errors
    ///
    /// [`ViewError::Geometry`] on an invalid coordinate;
    /// [`ViewError::WrongMode`] while drawing a polygon.
    pub fn stage_radius_center(&mut self, lat: f64, display_lng: f64) -> Result<(), ViewError> {
        if self.mode == SearchMode::PolygonDrawing {
            return Err(ViewError::WrongMode {
                operation: "staging a radius centre",
                mode: self.mode,
            });
        }
        let point = DisplayPoint::new(lat, display_lng)?;
        if self.mode == SearchMode::PolygonActive {
            self.clear_polygon();
        }
        self.staged_center = Some(point.to_storage());
        self.render_decorations();
        Ok(())
    }

    /// Updates the search radius and redraws the staged circle.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive or non-finite radius without touching
    /// state.
    pub fn set_radius_km(&mut self, radius_km: f64) -> Result<(), ViewError> {
        validate_radius(radius_km)?;
        self.radius_km = radius_km;
        if self.staged_center.is_some() {
            self.render_decorations();
        }
        Ok(())
    }

    /// Submits a radius search for the staged centre.
    ///
    /// Any polygon state is cleared first; the mode moves to
    /// [`SearchMode::RadiusPending`] until the caller applies the
    /// response. An earlier in-flight radius search is superseded.
    ///
    /// # Errors
    ///
    /// [`ViewError::MissingSearchCenter`] when no centre is staged.
    pub fn begin_radius_search(&mut self) -> Result<RadiusSearch, ViewError> {
        let center = self.staged_center.ok_or(ViewError::MissingSearchCenter)?;

        if matches!(self.mode, SearchMode::PolygonDrawing | SearchMode::PolygonActive) {
            self.clear_polygon();
        }
        // Decorations come back with the results; until then the map
        // shows only what is already confirmed.
        self.markers
            .clear(&mut self.widget, MarkerSetName::SearchDecorationMarkers);

        let revert = match self.mode {
            SearchMode::RadiusPending => self
                .pending_radius
                .as_ref()
                .map_or(SearchMode::Idle, |p| p.revert),
            mode => mode,
        };
        let ticket = self.issue_ticket();
        let request = RadiusSearchRequest {
            latitude: center.lat,
            longitude: center.lon,
            radius_km: self.radius_km,
        };
        self.pending_radius = Some(PendingRadius {
            ticket,
            revert,
            center,
            radius_km: self.radius_km,
        });
        self.mode = SearchMode::RadiusPending;
        tracing::info!(
            lat = center.lat,
            lon = center.lon,
            radius_km = self.radius_km,
            "radius search submitted"
        );
        Ok(RadiusSearch { ticket, request })
    }

    /// Feeds back the outcome of a radius search.
    ///
    /// Success renders the results, redraws the centre decorations and
    /// recentres the view; failure reverts to the pre-submission mode.
    /// A superseded ticket is discarded silently.
    pub fn apply_radius_response<E: fmt::Display>(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<EarthquakeRecord>, E>,
    ) -> ResponseOutcome {
        let Some(pending) = self.pending_radius.take() else {
            tracing::debug!("radius response with no search outstanding, discarding");
            return ResponseOutcome::Stale;
        };
        if pending.ticket != ticket {
            self.pending_radius = Some(pending);
            tracing::debug!("superseded radius response, discarding");
            return ResponseOutcome::Stale;
        }

        match result {
            Ok(records) => {
                let items = event_items(&records);
                self.markers
                    .render(&mut self.widget, MarkerSetName::EventMarkers, &items);
                self.staged_center = Some(pending.center);
                self.radius_km = pending.radius_km;
                self.render_decorations();
                let center = pending.center.to_display();
                self.widget
                    .set_view(center, zoom_for_radius(pending.radius_km));
                self.mode = SearchMode::RadiusActive;
                tracing::info!(results = records.len(), "radius search applied");
                ResponseOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(%e, "radius search failed");
                self.mode = pending.revert;
                ResponseOutcome::Failed
            }
        }
    }

    /// Enters polygon drawing mode, discarding any staged radius search
    /// and any previously drawn polygon.
    pub fn start_polygon_drawing(&mut self) {
        self.pending_radius = None;
        self.staged_center = None;
        self.markers
            .clear(&mut self.widget, MarkerSetName::SearchDecorationMarkers);
        self.reset_polygon_state();
        self.mode = SearchMode::PolygonDrawing;
    }

    /// Adds a vertex from a display-space click. A click on the same
    /// point as the previous vertex is ignored; any in-flight polygon
    /// search is superseded by the edit.
    ///
    /// # Errors
    ///
    /// [`ViewError::WrongMode`] outside drawing mode;
    /// [`ViewError::Geometry`] on an invalid coordinate.
    pub fn add_polygon_vertex(&mut self, lat: f64, display_lng: f64) -> Result<(), ViewError> {
        if self.mode != SearchMode::PolygonDrawing {
            return Err(ViewError::WrongMode {
                operation: "adding a polygon vertex",
                mode: self.mode,
            });
        }
        let point = DisplayPoint::new(lat, display_lng)?.to_storage();
        if self.draft.last() == Some(&point) {
            tracing::debug!("repeated click on last vertex, ignoring");
            return Ok(());
        }
        self.pending_polygon = None;
        self.draft.push(point);

        let items: Vec<(MarkerKind, DisplayPoint)> = self
            .draft
            .iter()
            .map(|p| (MarkerKind::PolygonVertex, p.to_display()))
            .collect();
        self.markers
            .render(&mut self.widget, MarkerSetName::PolygonVertexMarkers, &items);

        if self.draft.len() >= 3 {
            self.remove_preview();
            let outline: Vec<DisplayPoint> = self.draft.iter().map(|p| p.to_display()).collect();
            self.preview = Some(self.widget.draw_ring(&outline));
        }
        Ok(())
    }

    /// Submits a search over the drawn polygon.
    ///
    /// The ring is repaired at the antimeridian here; the result may be
    /// one or two rings. The mode stays [`SearchMode::PolygonDrawing`]
    /// until the response is applied.
    ///
    /// # Errors
    ///
    /// [`ViewError::WrongMode`] outside drawing mode;
    /// [`ViewError::Geometry`] when the draft does not form a valid
    /// ring (fewer than 3 vertices, or first equal to last).
    pub fn begin_polygon_search(&mut self) -> Result<PolygonSearch, ViewError> {
        if self.mode != SearchMode::PolygonDrawing {
            return Err(ViewError::WrongMode {
                operation: "polygon search",
                mode: self.mode,
            });
        }
        let ring = Ring::new(self.draft.clone())?;
        let geometry = split_at_antimeridian(&ring);

        self.pending_radius = None;
        self.staged_center = None;
        self.markers
            .clear(&mut self.widget, MarkerSetName::SearchDecorationMarkers);

        let ticket = self.issue_ticket();
        self.pending_polygon = Some(ticket);
        tracing::info!(
            vertices = ring.len(),
            rings = geometry.rings().len(),
            "polygon search submitted"
        );
        Ok(PolygonSearch { ticket, geometry })
    }

    /// Ends drawing mode: submits a search when the draft holds at
    /// least 3 vertices, otherwise abandons the draft and returns to
    /// [`SearchMode::Idle`].
    ///
    /// # Errors
    ///
    /// [`ViewError::WrongMode`] outside drawing mode.
    pub fn finish_polygon_drawing(&mut self) -> Result<Option<PolygonSearch>, ViewError> {
        if self.mode != SearchMode::PolygonDrawing {
            return Err(ViewError::WrongMode {
                operation: "finishing polygon drawing",
                mode: self.mode,
            });
        }
        if self.draft.len() < 3 {
            tracing::debug!(vertices = self.draft.len(), "abandoning incomplete polygon");
            self.reset_polygon_state();
            self.mode = SearchMode::Idle;
            return Ok(None);
        }
        self.begin_polygon_search().map(Some)
    }

    /// Feeds back the outcome of a polygon search.
    ///
    /// Success renders the results and moves to
    /// [`SearchMode::PolygonActive`], keeping the drawn ring and vertex
    /// pins on the map. Failure returns to drawing mode with the draft
    /// intact so the user can adjust and resubmit.
    pub fn apply_polygon_response<E: fmt::Display>(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<EarthquakeRecord>, E>,
    ) -> ResponseOutcome {
        if self.pending_polygon != Some(ticket) {
            tracing::debug!("superseded polygon response, discarding");
            return ResponseOutcome::Stale;
        }
        self.pending_polygon = None;

        match result {
            Ok(records) => {
                let items = event_items(&records);
                self.markers
                    .render(&mut self.widget, MarkerSetName::EventMarkers, &items);
                self.mode = SearchMode::PolygonActive;
                tracing::info!(results = records.len(), "polygon search applied");
                ResponseOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(%e, "polygon search failed");
                self.mode = SearchMode::PolygonDrawing;
                ResponseOutcome::Failed
            }
        }
    }

    /// Clears the staged centre and decorations; when a radius search
    /// is pending or active, also clears its results and returns to
    /// [`SearchMode::Idle`] with inputs unlocked.
    pub fn clear_radius_search(&mut self) {
        self.staged_center = None;
        self.pending_radius = None;
        self.markers
            .clear(&mut self.widget, MarkerSetName::SearchDecorationMarkers);
        if matches!(self.mode, SearchMode::RadiusPending | SearchMode::RadiusActive) {
            self.markers
                .clear(&mut self.widget, MarkerSetName::EventMarkers);
            self.mode = SearchMode::Idle;
        }
    }

    /// Removes the drawn polygon, its vertex pins and (when in a
    /// polygon mode) its results, returning to [`SearchMode::Idle`].
    pub fn clear_polygon(&mut self) {
        self.reset_polygon_state();
        if matches!(self.mode, SearchMode::PolygonDrawing | SearchMode::PolygonActive) {
            self.markers
                .clear(&mut self.widget, MarkerSetName::EventMarkers);
            self.mode = SearchMode::Idle;
        }
    }

    fn reset_polygon_state(&mut self) {
        self.draft.clear();
        self.pending_polygon = None;
        self.markers
            .clear(&mut self.widget, MarkerSetName::PolygonVertexMarkers);
        self.remove_preview();
    }

    fn render_decorations(&mut self) {
        if let Some(center) = self.staged_center {
            let at = center.to_display();
            let items = [
                (MarkerKind::SearchCenter, at),
                (MarkerKind::RadiusCircle { radius_km: self.radius_km }, at),
            ];
            self.markers
                .render(&mut self.widget, MarkerSetName::SearchDecorationMarkers, &items);
        }
    }

    fn remove_preview(&mut self) {
        if let Some(id) = self.preview.take() {
            self.widget.remove_ring(id);
        }
    }

    fn issue_ticket(&mut self) -> SearchTicket {
        self.next_ticket += 1;
        SearchTicket(self.next_ticket)
    }
}

fn validate_radius(radius_km: f64) -> Result<(), ViewError> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(ViewError::Geometry(
            quakemap_core::GeoError::InvalidGeometry(format!(
                "radius must be a positive number of kilometres, got {radius_km}"
            )),
        ));
    }
    Ok(())
}

/// Map backend records to event markers, skipping records without a
/// usable position.
fn event_items(records: &[EarthquakeRecord]) -> Vec<(MarkerKind, DisplayPoint)> {
    records
        .iter()
        .filter_map(|record| {
            let lat = record.latitude?;
            let lon = record.longitude?;
            match GeoPoint::new(lat, lon) {
                Ok(point) => Some((
                    MarkerKind::Event {
                        magnitude: record.magnitude,
                    },
                    point.to_display(),
                )),
                Err(e) => {
                    tracing::warn!(id = %record.id, %e, "skipping event with invalid position");
                    None
                }
            }
        })
        .collect()
}

/// Zoom level for a freshly applied radius search; wider radii zoom
/// further out.
fn zoom_for_radius(radius_km: f64) -> u8 {
    if radius_km > 500.0 {
        5
    } else if radius_km > 100.0 {
        7
    } else if radius_km > 50.0 {
        8
    } else {
        10
    }
}
