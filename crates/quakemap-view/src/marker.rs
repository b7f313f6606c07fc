//! Named marker sets and the map-widget seam.
//!
//! Markers live on the map widget; this module tracks which logical set
//! each widget handle belongs to so a set can be replaced or cleared as
//! a unit without leaking stale handles.

use quakemap_core::DisplayPoint;

/// Opaque handle to an object drawn on the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// What a marker represents; widgets style by kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerKind {
    /// A seismic event, sized by magnitude when known.
    Event { magnitude: Option<f64> },
    /// The centre pin of a radius search.
    SearchCenter,
    /// The circle outline of a radius search.
    RadiusCircle { radius_km: f64 },
    /// A vertex placed while drawing a polygon.
    PolygonVertex,
}

/// The three disjoint marker sets the controller manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerSetName {
    /// Event results of the most recent fetch or search.
    EventMarkers,
    /// Radius-search centre pin and circle.
    SearchDecorationMarkers,
    /// Vertex pins of the polygon being drawn.
    PolygonVertexMarkers,
}

/// Rendering surface the controller drives.
///
/// Every draw call returns a handle; the controller is responsible for
/// removing handles it no longer wants shown. Implementations do not
/// need to deduplicate or validate, the controller guarantees each
/// handle is removed at most once.
pub trait MapWidget {
    /// Places a marker at a display-space point and returns its handle.
    fn add_marker(&mut self, kind: MarkerKind, at: DisplayPoint) -> MarkerId;

    /// Removes a previously added marker.
    fn remove_marker(&mut self, id: MarkerId);

    /// Draws a polygon outline through display-space points.
    fn draw_ring(&mut self, points: &[DisplayPoint]) -> MarkerId;

    /// Removes a previously drawn polygon outline.
    fn remove_ring(&mut self, id: MarkerId);

    /// Recentres the viewport.
    fn set_view(&mut self, center: DisplayPoint, zoom: u8);
}

/// Tracks which widget handles belong to which named set.
///
/// A handle belongs to exactly one set from `render` until the next
/// `render` or `clear` of that set. Replacement releases every old
/// handle before the first new one is added, so the widget never holds
/// two generations of the same set at once.
#[derive(Debug, Default)]
pub struct MarkerSets {
    events: Vec<MarkerId>,
    decorations: Vec<MarkerId>,
    vertices: Vec<MarkerId>,
}

impl MarkerSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire named set with `items`.
    pub fn render<W: MapWidget + ?Sized>(
        &mut self,
        widget: &mut W,
        set: MarkerSetName,
        items: &[(MarkerKind, DisplayPoint)],
    ) {
        self.clear(widget, set);
        let slot = self.slot_mut(set);
        for (kind, at) in items {
            slot.push(widget.add_marker(*kind, *at));
        }
        tracing::trace!(?set, count = items.len(), "marker set rendered");
    }

    /// Removes every marker in the named set.
    pub fn clear<W: MapWidget + ?Sized>(&mut self, widget: &mut W, set: MarkerSetName) {
        for id in self.slot_mut(set).drain(..) {
            widget.remove_marker(id);
        }
    }

    pub fn len(&self, set: MarkerSetName) -> usize {
        self.slot(set).len()
    }

    pub fn is_empty(&self, set: MarkerSetName) -> bool {
        self.slot(set).is_empty()
    }

    fn slot(&self, set: MarkerSetName) -> &Vec<MarkerId> {
        match set {
            MarkerSetName::EventMarkers => &self.events,
            MarkerSetName::SearchDecorationMarkers => &self.decorations,
            MarkerSetName::PolygonVertexMarkers => &self.vertices,
        }
    }

    fn slot_mut(&mut self, set: MarkerSetName) -> &mut Vec<MarkerId> {
        match set {
            MarkerSetName::EventMarkers => &mut self.events,
            MarkerSetName::SearchDecorationMarkers => &mut self.decorations,
            MarkerSetName::PolygonVertexMarkers => &mut self.vertices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fake widget recording every call, for lifecycle assertions.
    #[derive(Debug, Default)]
    pub struct RecordingMap {
        next_id: u64,
        pub live_markers: Vec<MarkerId>,
    }

    impl MapWidget for RecordingMap {
        fn add_marker(&mut self, _kind: MarkerKind, _at: DisplayPoint) -> MarkerId {
            let id = MarkerId(self.next_id);
            self.next_id += 1;
            self.live_markers.push(id);
            id
        }

        fn remove_marker(&mut self, id: MarkerId) {
            let before = self.live_markers.len();
            self.live_markers.retain(|m| *m != id);
            assert_eq!(before, self.live_markers.len() + 1, "double remove");
        }

        fn draw_ring(&mut self, _points: &[DisplayPoint]) -> MarkerId {
            let id = MarkerId(self.next_id);
            self.next_id += 1;
            self.live_markers.push(id);
            id
        }

        fn remove_ring(&mut self, id: MarkerId) {
            self.remove_marker(id);
        }

        fn set_view(&mut self, _center: DisplayPoint, _zoom: u8) {}
    }

    fn pt(lat: f64, lon: f64) -> DisplayPoint {
        DisplayPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn render_replaces_previous_generation() {
        let mut widget = RecordingMap::default();
        let mut sets = MarkerSets::new();

        let gen1 = [
            (MarkerKind::Event { magnitude: Some(4.0) }, pt(0.0, 10.0)),
            (MarkerKind::Event { magnitude: None }, pt(1.0, 11.0)),
        ];
        sets.render(&mut widget, MarkerSetName::EventMarkers, &gen1);
        assert_eq!(widget.live_markers.len(), 2);

        let gen2 = [(MarkerKind::Event { magnitude: Some(5.5) }, pt(2.0, 12.0))];
        sets.render(&mut widget, MarkerSetName::EventMarkers, &gen2);

        assert_eq!(widget.live_markers.len(), 1);
        assert_eq!(sets.len(MarkerSetName::EventMarkers), 1);
    }

    #[test]
    fn clear_only_touches_named_set() {
        let mut widget = RecordingMap::default();
        let mut sets = MarkerSets::new();

        sets.render(
            &mut widget,
            MarkerSetName::EventMarkers,
            &[(MarkerKind::Event { magnitude: None }, pt(0.0, 0.0))],
        );
        sets.render(
            &mut widget,
            MarkerSetName::PolygonVertexMarkers,
            &[(MarkerKind::PolygonVertex, pt(5.0, 5.0))],
        );

        sets.clear(&mut widget, MarkerSetName::EventMarkers);

        assert!(sets.is_empty(MarkerSetName::EventMarkers));
        assert_eq!(sets.len(MarkerSetName::PolygonVertexMarkers), 1);
        assert_eq!(widget.live_markers.len(), 1);
    }

    #[test]
    fn clearing_an_empty_set_is_a_no_op() {
        let mut widget = RecordingMap::default();
        let mut sets = MarkerSets::new();
        sets.clear(&mut widget, MarkerSetName::SearchDecorationMarkers);
        assert!(widget.live_markers.is_empty());
    }
}
