use quakemap_core::GeoError;
use thiserror::Error;

use crate::controller::SearchMode;

/// Errors from the search-mode controller.
///
/// All variants are reported synchronously, before any state transition
/// or network call, so a rejected operation never leaves the machine
/// half-switched.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Invalid coordinate or ring geometry.
    #[error(transparent)]
    Geometry(#[from] GeoError),

    /// The operation is not valid in the current mode.
    #[error("{operation} is not valid while {mode}")]
    WrongMode {
        operation: &'static str,
        mode: SearchMode,
    },

    /// A radius search was submitted before a centre was staged.
    #[error("no search centre staged; click the map first")]
    MissingSearchCenter,
}
