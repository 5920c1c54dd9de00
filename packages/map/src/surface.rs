//! The drawing boundary of the map view.
//!
//! A [`MapSurface`] knows how to put markers and popups on screen and how
//! geographic positions map to canvas pixels. It holds no dashboard state;
//! [`MapView`](crate::MapView) decides what is shown.

use car_map_car_models::LngLat;
use serde::Serialize;

use crate::color::Rgb;

/// Identifies a marker. Ids are never reused across renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MarkerId(pub u64);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A marker for one location group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Marker id.
    pub id: MarkerId,
    /// Where the marker is placed.
    pub position: LngLat,
    /// Fill color.
    pub color: Rgb,
    /// Location label, e.g. `"Austin, TX"`.
    pub label: String,
    /// Number of cars filmed at the location.
    pub count: usize,
}

impl Marker {
    /// The popup shown for this marker.
    #[must_use]
    pub fn popup(&self) -> Popup {
        Popup {
            title: self.label.clone(),
            body: format!("Cars: {}", self.count),
        }
    }
}

/// Popup content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popup {
    /// First line.
    pub title: String,
    /// Second line.
    pub body: String,
}

impl Popup {
    /// The popup as plain text, one line per field.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}\n{}", self.title, self.body)
    }
}

/// A point on the canvas, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Displacement, in pixels, of a popup's bottom-center tip from its
/// marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// Something that can draw markers and popups.
pub trait MapSurface {
    /// Draws `marker`.
    fn add_marker(&mut self, marker: &Marker);

    /// Removes a previously added marker (and its popup, if shown).
    fn remove_marker(&mut self, id: MarkerId);

    /// Shows the popup of marker `id` displaced by `offset`.
    fn show_popup(&mut self, id: MarkerId, popup: &Popup, offset: Offset);

    /// Hides the popup of marker `id`.
    fn hide_popup(&mut self, id: MarkerId);

    /// Projects a geographic position onto the canvas.
    fn project(&self, position: LngLat) -> ScreenPoint;

    /// Size of the visible canvas.
    fn canvas_size(&self) -> Size;

    /// Size the popup will take once rendered.
    fn measure_popup(&self, popup: &Popup) -> Size;
}
