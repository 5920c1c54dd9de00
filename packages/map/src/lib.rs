#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map view for the car map dashboard.
//!
//! The filtered subset is grouped by filming location ([`group`]), one
//! marker is drawn per group that has coordinates, and each marker is
//! colored by how many cars were filmed there relative to the busiest
//! location ([`color`]). Popups follow a small hover/click state machine
//! and are nudged back inside the canvas before every show ([`popup`]).
//!
//! [`MapView`] owns all of that state and drives a [`MapSurface`], the
//! boundary to whatever actually draws the map. [`GeoJsonSurface`] is a
//! surface that records markers and popups and exports them as `GeoJSON`.

pub mod color;
pub mod geojson_surface;
pub mod group;
pub mod popup;
pub mod surface;
pub mod view;

pub use color::{ColorScale, Rgb};
pub use geojson_surface::{GeoJsonSurface, Viewport};
pub use group::{LocationGroup, LocationKey, group_by_location};
pub use popup::{PopupState, place_popup};
pub use surface::{MapSurface, Marker, MarkerId, Offset, Popup, ScreenPoint, Size};
pub use view::MapView;

/// Errors returned by [`MapView`] interactions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The marker id does not belong to the current render.
    #[error("Unknown marker {0}")]
    UnknownMarker(MarkerId),
}
