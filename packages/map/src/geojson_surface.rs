//! A [`MapSurface`] that keeps markers and popups in memory and exports
//! them as a `GeoJSON` `FeatureCollection`.
//!
//! Screen positions use the web mercator projection with 512 px tiles, the
//! same convention as Mapbox GL, so popup placement computed here matches
//! what the browser map shows for the same center, zoom and canvas size.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use car_map_car_models::LngLat;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::{Deserialize, Serialize};

use crate::surface::{MapSurface, Marker, MarkerId, Offset, Popup, ScreenPoint, Size};

const TILE_SIZE: f64 = 512.0;
const MAX_LATITUDE: f64 = 85.051_128_78;

const CHAR_WIDTH: f64 = 7.0;
const LINE_HEIGHT: f64 = 18.0;
const POPUP_PADDING: f64 = 10.0;

/// Camera and canvas of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Map center as `[lng, lat]`.
    pub center: [f64; 2],
    /// Zoom level.
    pub zoom: f64,
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            // Center of the contiguous US.
            center: [-98.5795, 39.8283],
            zoom: 4.0,
            width: 1024.0,
            height: 640.0,
        }
    }
}

impl Viewport {
    /// World pixel coordinates of `position` at this zoom.
    fn world(&self, position: LngLat) -> ScreenPoint {
        let world_size = TILE_SIZE * self.zoom.exp2();
        let lat = position.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        ScreenPoint {
            x: (position.lng + 180.0) / 360.0 * world_size,
            y: (1.0 - lat.tan().asinh() / PI) / 2.0 * world_size,
        }
    }

    /// Canvas coordinates of `position`.
    #[must_use]
    pub fn project(&self, position: LngLat) -> ScreenPoint {
        let point = self.world(position);
        let center = self.world(LngLat::new(self.center[0], self.center[1]));
        ScreenPoint {
            x: point.x - center.x + self.width / 2.0,
            y: point.y - center.y + self.height / 2.0,
        }
    }
}

/// A popup as currently shown.
#[derive(Debug, Clone, PartialEq)]
struct ShownPopup {
    popup: Popup,
    offset: Offset,
}

/// In-memory map surface.
#[derive(Debug, Clone, Default)]
pub struct GeoJsonSurface {
    viewport: Viewport,
    markers: BTreeMap<MarkerId, Marker>,
    popups: BTreeMap<MarkerId, ShownPopup>,
}

impl GeoJsonSurface {
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            markers: BTreeMap::new(),
            popups: BTreeMap::new(),
        }
    }

    /// The viewport used for projection.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Markers currently drawn, by id.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    /// Popup text and offset of marker `id`, if its popup is shown.
    #[must_use]
    pub fn popup(&self, id: MarkerId) -> Option<(&Popup, Offset)> {
        self.popups.get(&id).map(|shown| (&shown.popup, shown.offset))
    }

    /// Exports every marker as a `Point` feature.
    ///
    /// Properties: `id`, `label`, `count`, `color`, and, for markers whose
    /// popup is shown, `popup` (text) and `popupOffset` (`[x, y]`).
    #[must_use]
    pub fn feature_collection(&self) -> FeatureCollection {
        let features = self
            .markers
            .values()
            .map(|marker| {
                let mut properties = JsonObject::new();
                properties.insert("id".to_string(), marker.id.0.into());
                properties.insert("label".to_string(), marker.label.clone().into());
                properties.insert("count".to_string(), marker.count.into());
                properties.insert("color".to_string(), marker.color.to_string().into());
                if let Some(shown) = self.popups.get(&marker.id) {
                    properties.insert("popup".to_string(), shown.popup.text().into());
                    properties.insert(
                        "popupOffset".to_string(),
                        serde_json::json!([shown.offset.x, shown.offset.y]),
                    );
                }

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::Point(vec![
                        marker.position.lng,
                        marker.position.lat,
                    ]))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    /// The feature collection serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.feature_collection())
    }
}

impl MapSurface for GeoJsonSurface {
    fn add_marker(&mut self, marker: &Marker) {
        self.markers.insert(marker.id, marker.clone());
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
        self.popups.remove(&id);
    }

    fn show_popup(&mut self, id: MarkerId, popup: &Popup, offset: Offset) {
        self.popups.insert(
            id,
            ShownPopup {
                popup: popup.clone(),
                offset,
            },
        );
    }

    fn hide_popup(&mut self, id: MarkerId) {
        self.popups.remove(&id);
    }

    fn project(&self, position: LngLat) -> ScreenPoint {
        self.viewport.project(position)
    }

    fn canvas_size(&self) -> Size {
        Size {
            width: self.viewport.width,
            height: self.viewport.height,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_popup(&self, popup: &Popup) -> Size {
        let text = popup.text();
        let columns = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
        let lines = text.lines().count();
        Size {
            width: (columns as f64).mul_add(CHAR_WIDTH, 2.0 * POPUP_PADDING),
            height: (lines as f64).mul_add(LINE_HEIGHT, 2.0 * POPUP_PADDING),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn marker(id: u64, lng: f64, lat: f64) -> Marker {
        Marker {
            id: MarkerId(id),
            position: LngLat::new(lng, lat),
            color: Rgb::new(0xbd, 0x00, 0x26),
            label: "Austin, TX".to_string(),
            count: 2,
        }
    }

    #[test]
    fn center_projects_to_canvas_middle() {
        let viewport = Viewport::default();
        let point = viewport.project(LngLat::new(viewport.center[0], viewport.center[1]));
        assert!((point.x - 512.0).abs() < 1e-9);
        assert!((point.y - 320.0).abs() < 1e-9);
    }

    #[test]
    fn projection_orientation() {
        let viewport = Viewport::default();
        let center = viewport.project(LngLat::new(-98.5795, 39.8283));
        let east = viewport.project(LngLat::new(-90.0, 39.8283));
        let north = viewport.project(LngLat::new(-98.5795, 45.0));
        assert!(east.x > center.x);
        assert!(north.y < center.y);
    }

    #[test]
    fn popup_size_grows_with_text() {
        let surface = GeoJsonSurface::default();
        let short = surface.measure_popup(&marker(0, 0.0, 0.0).popup());
        let mut long_marker = marker(0, 0.0, 0.0);
        long_marker.label = "Rancho Palos Verdes, CA".to_string();
        let long = surface.measure_popup(&long_marker.popup());
        assert!(long.width > short.width);
        assert!((short.height - long.height).abs() < f64::EPSILON);
    }

    #[test]
    fn exports_markers_and_shown_popups() {
        let mut surface = GeoJsonSurface::default();
        let austin = marker(1, -97.74, 30.27);
        surface.add_marker(&austin);
        surface.add_marker(&marker(2, -104.99, 39.74));
        surface.show_popup(MarkerId(1), &austin.popup(), Offset { x: 0.0, y: -25.0 });

        let collection = surface.feature_collection();
        assert_eq!(collection.features.len(), 2);

        let first = &collection.features[0];
        let properties = first.properties.as_ref().unwrap();
        assert_eq!(properties["label"], "Austin, TX");
        assert_eq!(properties["count"], 2);
        assert_eq!(properties["color"], "#bd0026");
        assert_eq!(properties["popup"], "Austin, TX\nCars: 2");
        assert!(
            collection.features[1]
                .properties
                .as_ref()
                .unwrap()
                .get("popup")
                .is_none()
        );

        let json: serde_json::Value = serde_json::from_str(&surface.to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["geometry"]["coordinates"][0], -97.74);
    }

    #[test]
    fn removing_a_marker_drops_its_popup() {
        let mut surface = GeoJsonSurface::default();
        let austin = marker(1, -97.74, 30.27);
        surface.add_marker(&austin);
        surface.show_popup(MarkerId(1), &austin.popup(), Offset { x: 0.0, y: -25.0 });
        surface.remove_marker(MarkerId(1));
        assert!(surface.popup(MarkerId(1)).is_none());
        assert_eq!(surface.markers().count(), 0);
    }
}
