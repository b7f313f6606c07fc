//! Search-mode state machine and marker lifecycle for the map explorer.
//!
//! This crate owns which interaction mode is active (free browsing,
//! radius search, polygon draw/search) and the marker collections each
//! mode is allowed to hold. It renders nothing itself: the map widget
//! is injected through the [`MapWidget`] trait, so the whole machine is
//! testable without a UI toolkit.

pub mod controller;
pub mod error;
pub mod marker;

pub use controller::{
    PolygonSearch, RadiusSearch, ResponseOutcome, SearchController, SearchMode, SearchTicket,
};
pub use error::ViewError;
pub use marker::{MapWidget, MarkerId, MarkerKind, MarkerSetName, MarkerSets};
