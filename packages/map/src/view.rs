//! Map view state.

use car_map_car_models::Dataset;
use car_map_filter::FilteredSubset;

use crate::MapError;
use crate::color::ColorScale;
use crate::group::{LocationGroup, group_by_location};
use crate::popup::{PopupState, place_popup};
use crate::surface::{MapSurface, Marker, MarkerId};

/// Default gap between a marker and its popup, in pixels.
pub const DEFAULT_POPUP_GAP: f64 = 25.0;

/// A drawn marker together with the group it stands for.
#[derive(Debug, Clone)]
struct MarkerEntry {
    marker: Marker,
    group: LocationGroup,
    popup: PopupState,
}

/// Owns the markers currently on the map and their popup states.
///
/// Built once per session. [`MapView::render`] replaces every marker with
/// those of a new filtered subset; pointer and click methods drive the
/// popup state machine.
pub struct MapView<S: MapSurface> {
    surface: S,
    scale: ColorScale,
    popup_gap: f64,
    markers: Vec<MarkerEntry>,
    active: Option<MarkerId>,
    next_id: u64,
}

impl<S: MapSurface> MapView<S> {
    #[must_use]
    pub const fn new(surface: S, scale: ColorScale, popup_gap: f64) -> Self {
        Self {
            surface,
            scale,
            popup_gap,
            markers: Vec::new(),
            active: None,
            next_id: 0,
        }
    }

    /// The surface being drawn on.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Markers currently on the map, in group order.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().map(|entry| &entry.marker)
    }

    /// The group behind marker `id`.
    #[must_use]
    pub fn group(&self, id: MarkerId) -> Option<&LocationGroup> {
        self.entry(id).map(|entry| &entry.group)
    }

    /// Popup state of marker `id`.
    #[must_use]
    pub fn popup_state(&self, id: MarkerId) -> Option<PopupState> {
        self.entry(id).map(|entry| entry.popup)
    }

    /// The marker whose popup is pinned open, if any.
    #[must_use]
    pub const fn active(&self) -> Option<MarkerId> {
        self.active
    }

    /// Markers whose popup is currently displayed.
    #[must_use]
    pub fn displayed_popups(&self) -> Vec<MarkerId> {
        self.markers
            .iter()
            .filter(|entry| entry.popup.is_shown())
            .map(|entry| entry.marker.id)
            .collect()
    }

    /// Replaces every marker with one per location group of `subset`.
    ///
    /// Groups whose first record has no coordinates get no marker. Colors
    /// are relative to the largest group, including groups that were not
    /// drawn.
    pub fn render(&mut self, dataset: &Dataset, subset: &FilteredSubset) {
        self.clear();

        let groups = group_by_location(dataset, subset.ids());
        let max = groups.iter().map(LocationGroup::count).max().unwrap_or(0);

        let mut skipped = 0_usize;
        for group in groups {
            let Some(position) = group.anchor else {
                skipped += 1;
                log::debug!("No coordinates for {}, skipping marker", group.key);
                continue;
            };

            let marker = Marker {
                id: MarkerId(self.next_id),
                position,
                color: self.scale.color(group.count(), max),
                label: group.key.to_string(),
                count: group.count(),
            };
            self.next_id += 1;

            self.surface.add_marker(&marker);
            self.markers.push(MarkerEntry {
                marker,
                group,
                popup: PopupState::Hidden,
            });
        }

        log::debug!(
            "Rendered {} markers ({skipped} locations without coordinates)",
            self.markers.len()
        );
    }

    /// Removes every marker and popup.
    pub fn clear(&mut self) {
        for entry in self.markers.drain(..) {
            if entry.popup.is_shown() {
                self.surface.hide_popup(entry.marker.id);
            }
            self.surface.remove_marker(entry.marker.id);
        }
        self.active = None;
    }

    /// The pointer entered marker `id`: show its popup as a hover popup
    /// unless it is already shown.
    ///
    /// A pinned popup on another marker is taken off screen for the
    /// duration of the hover but stays active.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownMarker`] if `id` is not on the map.
    pub fn pointer_enter(&mut self, id: MarkerId) -> Result<(), MapError> {
        let index = self.index(id)?;
        if self.markers[index].popup.is_shown() {
            return Ok(());
        }
        self.hide_all_except(id);
        let state = if self.active == Some(id) {
            PopupState::ActiveShown
        } else {
            PopupState::HoverShown
        };
        self.show(index, state);
        Ok(())
    }

    /// The pointer left marker `id`: hide its hover popup and bring back the
    /// active one, if any. Pinned popups stay.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownMarker`] if `id` is not on the map.
    pub fn pointer_leave(&mut self, id: MarkerId) -> Result<(), MapError> {
        let index = self.index(id)?;
        if self.markers[index].popup == PopupState::HoverShown {
            self.hide(index);
            if let Some(active) = self.active.and_then(|active| self.index(active).ok()) {
                self.show(active, PopupState::ActiveShown);
            }
        }
        Ok(())
    }

    /// Marker `id` was clicked: pin its popup, hiding any other, and return
    /// the group so its records can be listed.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownMarker`] if `id` is not on the map.
    pub fn click(&mut self, id: MarkerId) -> Result<&LocationGroup, MapError> {
        let index = self.index(id)?;
        self.hide_all_except(id);
        self.show(index, PopupState::ActiveShown);
        self.active = Some(id);
        Ok(&self.markers[index].group)
    }

    /// The map background was clicked: hide every popup. Markers stay.
    pub fn background_click(&mut self) {
        for index in 0..self.markers.len() {
            if self.markers[index].popup.is_shown() {
                self.hide(index);
            }
        }
        self.active = None;
    }

    fn entry(&self, id: MarkerId) -> Option<&MarkerEntry> {
        self.markers.iter().find(|entry| entry.marker.id == id)
    }

    fn index(&self, id: MarkerId) -> Result<usize, MapError> {
        self.markers
            .iter()
            .position(|entry| entry.marker.id == id)
            .ok_or(MapError::UnknownMarker(id))
    }

    fn hide_all_except(&mut self, id: MarkerId) {
        for index in 0..self.markers.len() {
            if self.markers[index].marker.id != id && self.markers[index].popup.is_shown() {
                self.hide(index);
            }
        }
    }

    /// Shows (or re-labels) the popup at `index`. Placement is recomputed
    /// on every show since the canvas may have moved.
    fn show(&mut self, index: usize, state: PopupState) {
        let entry = &mut self.markers[index];
        if !entry.popup.is_shown() {
            let popup = entry.marker.popup();
            let anchor = self.surface.project(entry.marker.position);
            let offset = place_popup(
                anchor,
                self.surface.measure_popup(&popup),
                self.surface.canvas_size(),
                self.popup_gap,
            );
            self.surface.show_popup(entry.marker.id, &popup, offset);
        }
        entry.popup = state;
    }

    fn hide(&mut self, index: usize) {
        let entry = &mut self.markers[index];
        self.surface.hide_popup(entry.marker.id);
        entry.popup = PopupState::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use car_map_car_models::{CarRecord, LngLat, Ratings};
    use car_map_filter::apply;
    use car_map_filter_models::FilterSelection;

    use super::*;
    use crate::surface::{Offset, Popup, ScreenPoint, Size};

    /// Surface that records every call.
    #[derive(Default)]
    struct RecordingSurface {
        markers: Vec<MarkerId>,
        popups: Vec<MarkerId>,
        shows: usize,
    }

    impl MapSurface for RecordingSurface {
        fn add_marker(&mut self, marker: &Marker) {
            self.markers.push(marker.id);
        }

        fn remove_marker(&mut self, id: MarkerId) {
            self.markers.retain(|m| *m != id);
        }

        fn show_popup(&mut self, id: MarkerId, _popup: &Popup, _offset: Offset) {
            assert!(!self.popups.contains(&id), "popup {id} shown twice");
            self.popups.push(id);
            self.shows += 1;
        }

        fn hide_popup(&mut self, id: MarkerId) {
            self.popups.retain(|p| *p != id);
        }

        fn project(&self, position: LngLat) -> ScreenPoint {
            ScreenPoint {
                x: position.lng,
                y: position.lat,
            }
        }

        fn canvas_size(&self) -> Size {
            Size {
                width: 800.0,
                height: 600.0,
            }
        }

        fn measure_popup(&self, _popup: &Popup) -> Size {
            Size {
                width: 100.0,
                height: 40.0,
            }
        }
    }

    fn car(make: &str, city: &str, coordinates: Option<LngLat>) -> CarRecord {
        CarRecord {
            make: make.to_string(),
            model: "X".to_string(),
            year: "2000".to_string(),
            year_value: Some(2000),
            film_city: city.to_string(),
            film_state: "TX".to_string(),
            coordinates,
            ratings: Ratings::default(),
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            car("Ford", "Austin", Some(LngLat::new(100.0, 100.0))),
            car("Ford", "Austin", Some(LngLat::new(900.0, 900.0))),
            car("Honda", "Dallas", Some(LngLat::new(300.0, 300.0))),
            car("Honda", "Nowhere", None),
            car("Mazda", "Houston", Some(LngLat::new(500.0, 200.0))),
        ])
    }

    fn rendered() -> (Dataset, MapView<RecordingSurface>) {
        let dataset = dataset();
        let mut view = MapView::new(RecordingSurface::default(), ColorScale::default(), 25.0);
        view.render(&dataset, &FilteredSubset::everything(&dataset));
        (dataset, view)
    }

    fn ids(view: &MapView<RecordingSurface>) -> Vec<MarkerId> {
        view.markers().map(|m| m.id).collect()
    }

    #[test]
    fn one_marker_per_located_group() {
        let (_, view) = rendered();
        let labels: Vec<&str> = view.markers().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["Austin, TX", "Dallas, TX", "Houston, TX"]);
        assert_eq!(view.surface().markers.len(), 3);

        let austin = view.markers().next().unwrap();
        assert_eq!(austin.count, 2);
        assert_eq!(austin.position, LngLat::new(100.0, 100.0));
        assert_eq!(austin.color, ColorScale::default().high);
    }

    #[test]
    fn rerender_replaces_markers_with_fresh_ids() {
        let (dataset, mut view) = rendered();
        let before = ids(&view);

        let fords = apply(&dataset, &FilterSelection::from_labels("Ford", "All", "All"));
        view.render(&dataset, &fords);

        let after = ids(&view);
        assert_eq!(after.len(), 1);
        assert!(!before.contains(&after[0]));
        assert_eq!(view.surface().markers, after);
    }

    #[test]
    fn empty_subset_draws_nothing() {
        let (dataset, mut view) = rendered();
        view.render(&dataset, &FilteredSubset::default());
        assert_eq!(view.markers().count(), 0);
        assert!(view.surface().markers.is_empty());
    }

    #[test]
    fn hover_shows_and_leave_hides() {
        let (_, mut view) = rendered();
        let id = ids(&view)[0];

        view.pointer_enter(id).unwrap();
        assert_eq!(view.popup_state(id), Some(PopupState::HoverShown));
        assert_eq!(view.surface().popups, [id]);

        view.pointer_leave(id).unwrap();
        assert_eq!(view.popup_state(id), Some(PopupState::Hidden));
        assert!(view.surface().popups.is_empty());
    }

    #[test]
    fn click_pins_popup_through_leave() {
        let (_, mut view) = rendered();
        let id = ids(&view)[1];

        view.pointer_enter(id).unwrap();
        let group = view.click(id).unwrap();
        assert_eq!(group.key.to_string(), "Dallas, TX");
        assert_eq!(view.popup_state(id), Some(PopupState::ActiveShown));
        assert_eq!(view.active(), Some(id));
        // Hover-to-active keeps the same popup on screen.
        assert_eq!(view.surface().shows, 1);

        view.pointer_leave(id).unwrap();
        view.pointer_enter(id).unwrap();
        assert_eq!(view.popup_state(id), Some(PopupState::ActiveShown));
        assert_eq!(view.surface().popups, [id]);
    }

    #[test]
    fn at_most_one_popup_is_displayed() {
        let (_, mut view) = rendered();
        let all = ids(&view);

        view.click(all[0]).unwrap();
        view.pointer_enter(all[1]).unwrap();
        assert_eq!(view.displayed_popups(), [all[1]]);
        assert_eq!(view.active(), Some(all[0]));

        view.click(all[2]).unwrap();
        assert_eq!(view.displayed_popups(), [all[2]]);
        assert_eq!(view.popup_state(all[1]), Some(PopupState::Hidden));

        view.click(all[0]).unwrap();
        assert_eq!(view.displayed_popups(), [all[0]]);
        assert_eq!(view.surface().popups, [all[0]]);
        assert_eq!(view.active(), Some(all[0]));
    }

    #[test]
    fn hovering_another_marker_keeps_active_popup() {
        let (_, mut view) = rendered();
        let all = ids(&view);

        view.click(all[0]).unwrap();
        view.pointer_enter(all[1]).unwrap();
        assert_eq!(view.popup_state(all[0]), Some(PopupState::Hidden));
        assert_eq!(view.surface().popups, [all[1]]);

        view.pointer_leave(all[1]).unwrap();
        assert_eq!(view.popup_state(all[0]), Some(PopupState::ActiveShown));
        assert_eq!(view.popup_state(all[1]), Some(PopupState::Hidden));
        assert_eq!(view.active(), Some(all[0]));
        assert_eq!(view.displayed_popups(), [all[0]]);
        assert_eq!(view.surface().popups, [all[0]]);
    }

    #[test]
    fn entering_active_marker_while_another_hovers_restores_it() {
        let (_, mut view) = rendered();
        let all = ids(&view);

        view.click(all[0]).unwrap();
        view.pointer_enter(all[1]).unwrap();
        view.pointer_enter(all[0]).unwrap();
        assert_eq!(view.popup_state(all[0]), Some(PopupState::ActiveShown));
        assert_eq!(view.displayed_popups(), [all[0]]);

        view.pointer_leave(all[0]).unwrap();
        assert_eq!(view.displayed_popups(), [all[0]]);
    }

    #[test]
    fn background_click_hides_popup_but_keeps_markers() {
        let (_, mut view) = rendered();
        let id = ids(&view)[0];

        view.click(id).unwrap();
        view.background_click();

        assert_eq!(view.active(), None);
        assert!(view.displayed_popups().is_empty());
        assert!(view.surface().popups.is_empty());
        assert_eq!(view.markers().count(), 3);
    }

    #[test]
    fn stale_marker_ids_are_rejected() {
        let (dataset, mut view) = rendered();
        let stale = ids(&view)[0];
        view.render(&dataset, &FilteredSubset::everything(&dataset));

        assert_eq!(view.click(stale).unwrap_err(), MapError::UnknownMarker(stale));
        assert!(view.pointer_enter(stale).is_err());
        assert!(view.pointer_leave(stale).is_err());
    }

    #[test]
    fn render_hides_active_popup() {
        let (dataset, mut view) = rendered();
        view.click(ids(&view)[0]).unwrap();
        view.render(&dataset, &FilteredSubset::everything(&dataset));
        assert!(view.surface().popups.is_empty());
        assert_eq!(view.active(), None);
    }
}
