#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Orchestration for the car map dashboard.
//!
//! [`Dashboard`] owns the dataset, the [`DropdownController`], the results
//! table and the [`MapView`]. Every user interaction is a [`UiEvent`] passed
//! to [`Dashboard::handle`]; dropdown events end in
//! [`Dashboard::on_selection_changed`], the only place where the filtered
//! subset is recomputed and both views are re-rendered from it.

pub mod config;
pub mod controller;
pub mod controls;

use car_map_car_models::{CarRecord, Dataset};
use car_map_filter::{FilteredSubset, apply, derive_options};
use car_map_filter_models::FilterSelection;
use car_map_map::{MapError, MapSurface, MapView, MarkerId};
use car_map_table::TableSink;

pub use config::{ConfigError, DashboardConfig, MapConfig};
pub use controller::DropdownController;
pub use controls::{ControlError, ControlId, SelectControl};

/// Errors returned by [`Dashboard::handle`]. State is unchanged when one is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error(transparent)]
    Map(#[from] MapError),
}

/// A user interaction with the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A make was picked in the make dropdown.
    MakeChanged(String),
    /// A model was picked in the model dropdown.
    ModelChanged(String),
    /// A year bucket was picked in the year dropdown.
    YearChanged(String),
    /// The clear button was pressed.
    Clear,
    /// The pointer moved onto a marker.
    MarkerEntered(MarkerId),
    /// The pointer moved off a marker.
    MarkerLeft(MarkerId),
    /// A marker was clicked.
    MarkerClicked(MarkerId),
    /// The map was clicked away from any marker.
    BackgroundClicked,
}

impl UiEvent {
    /// The event a page element emits: a value change for the dropdowns, a
    /// press for the clear button (`value` is ignored).
    ///
    /// # Errors
    ///
    /// * If `element` is not a dropdown or the clear button
    pub fn from_element(element: &str, value: &str) -> Result<Self, ControlError> {
        let id = element
            .parse::<ControlId>()
            .map_err(|_| ControlError::UnknownControl(element.to_string()))?;

        match id {
            ControlId::Make => Ok(Self::MakeChanged(value.to_string())),
            ControlId::Model => Ok(Self::ModelChanged(value.to_string())),
            ControlId::Year => Ok(Self::YearChanged(value.to_string())),
            ControlId::ClearButton => Ok(Self::Clear),
            ControlId::Map | ControlId::Results => {
                Err(ControlError::UnknownControl(element.to_string()))
            }
        }
    }
}

/// The dashboard state and its two views.
pub struct Dashboard<T: TableSink, S: MapSurface> {
    dataset: Dataset,
    controller: DropdownController,
    subset: FilteredSubset,
    table: T,
    map: MapView<S>,
    placeholder: String,
}

impl<T: TableSink, S: MapSurface> Dashboard<T, S> {
    /// Derives the dropdown options from `dataset`, then renders the
    /// unfiltered dataset into `table` and onto `surface`.
    #[must_use]
    pub fn new(dataset: Dataset, config: &DashboardConfig, table: T, surface: S) -> Self {
        let controller = DropdownController::new(derive_options(&dataset, config.years));
        let map = MapView::new(surface, config.map.colors, config.map.popup_offset);

        let mut dashboard = Self {
            subset: FilteredSubset::everything(&dataset),
            dataset,
            controller,
            table,
            map,
            placeholder: config.placeholder.clone(),
        };
        dashboard.on_selection_changed();
        dashboard
    }

    /// Applies `event`.
    ///
    /// # Errors
    ///
    /// * If a dropdown event names a value that is not one of its options
    /// * If a marker event names a marker that is not on the map
    pub fn handle(&mut self, event: UiEvent) -> Result<(), DashboardError> {
        log::trace!("handle: {event:?}");

        match event {
            UiEvent::MakeChanged(value) => {
                self.controller.change_make(&value)?;
                self.on_selection_changed();
            }
            UiEvent::ModelChanged(value) => {
                self.controller.change_model(&value)?;
                self.on_selection_changed();
            }
            UiEvent::YearChanged(value) => {
                self.controller.change_year(&value)?;
                self.on_selection_changed();
            }
            UiEvent::Clear => {
                self.controller.clear();
                self.on_selection_changed();
            }
            UiEvent::MarkerEntered(id) => self.map.pointer_enter(id)?,
            UiEvent::MarkerLeft(id) => self.map.pointer_leave(id)?,
            UiEvent::MarkerClicked(id) => {
                let group = self.map.click(id)?;
                let records: Vec<&CarRecord> = self.dataset.resolve(&group.records).collect();
                let location = group.key.to_string();
                self.table.show_records(&records, Some(&location));
            }
            UiEvent::BackgroundClicked => {
                self.map.background_click();
                self.table.show_placeholder(&self.placeholder);
            }
        }

        Ok(())
    }

    /// Recomputes the filtered subset from the dropdowns and re-renders the
    /// table and the map from it.
    pub fn on_selection_changed(&mut self) {
        let selection = self.controller.selection();
        self.subset = apply(&self.dataset, &selection);

        let records: Vec<&CarRecord> = self.subset.records(&self.dataset).collect();
        self.table.show_records(&records, None);
        self.map.render(&self.dataset, &self.subset);

        log::debug!(
            "Selection {selection}: {} records, {} markers",
            self.subset.len(),
            self.map.markers().count()
        );
    }

    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub const fn subset(&self) -> &FilteredSubset {
        &self.subset
    }

    #[must_use]
    pub fn selection(&self) -> FilterSelection {
        self.controller.selection()
    }

    #[must_use]
    pub const fn controller(&self) -> &DropdownController {
        &self.controller
    }

    #[must_use]
    pub const fn table(&self) -> &T {
        &self.table
    }

    #[must_use]
    pub const fn map(&self) -> &MapView<S> {
        &self.map
    }

    /// The subset's records, in dataset order.
    #[must_use]
    pub fn records(&self) -> Vec<&CarRecord> {
        self.subset.records(&self.dataset).collect()
    }
}

#[cfg(test)]
mod tests {
    use car_map_car_models::{LngLat, Ratings};
    use car_map_map::{GeoJsonSurface, PopupState, Viewport};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Shown {
        Rows {
            location: Option<String>,
            models: Vec<String>,
        },
        Placeholder(String),
    }

    /// Table that remembers what it was last asked to show.
    #[derive(Default)]
    struct RecordingTable {
        shown: Vec<Shown>,
    }

    impl RecordingTable {
        fn last(&self) -> &Shown {
            self.shown.last().unwrap()
        }
    }

    impl TableSink for RecordingTable {
        fn show_records(&mut self, records: &[&CarRecord], location: Option<&str>) {
            self.shown.push(Shown::Rows {
                location: location.map(ToString::to_string),
                models: records.iter().map(|r| r.model.clone()).collect(),
            });
        }

        fn show_placeholder(&mut self, message: &str) {
            self.shown.push(Shown::Placeholder(message.to_string()));
        }
    }

    fn car(make: &str, model: &str, year: i64, city: &str, state: &str, at: LngLat) -> CarRecord {
        CarRecord {
            make: make.to_string(),
            model: model.to_string(),
            year: year.to_string(),
            year_value: Some(year),
            film_city: city.to_string(),
            film_state: state.to_string(),
            coordinates: Some(at),
            ratings: Ratings::default(),
        }
    }

    fn dashboard() -> Dashboard<RecordingTable, GeoJsonSurface> {
        let austin = LngLat::new(-97.74, 30.27);
        let detroit = LngLat::new(-83.05, 42.33);
        let dataset = Dataset::new(vec![
            car("Ford", "Mustang", 1995, "Austin", "TX", austin),
            car("Ford", "GT", 2005, "Detroit", "MI", detroit),
            car("Honda", "Civic", 1998, "Austin", "TX", austin),
            car("Ford", "Bronco", 1992, "Detroit", "MI", detroit),
        ]);
        Dashboard::new(
            dataset,
            &DashboardConfig::default(),
            RecordingTable::default(),
            GeoJsonSurface::new(Viewport::default()),
        )
    }

    fn rows(models: &[&str], location: Option<&str>) -> Shown {
        Shown::Rows {
            location: location.map(ToString::to_string),
            models: models.iter().map(ToString::to_string).collect(),
        }
    }

    fn marker_for(dashboard: &Dashboard<RecordingTable, GeoJsonSurface>, label: &str) -> MarkerId {
        dashboard
            .map()
            .markers()
            .find(|m| m.label == label)
            .map(|m| m.id)
            .unwrap()
    }

    #[test]
    fn initial_render_shows_everything() {
        let dashboard = dashboard();
        assert_eq!(
            dashboard.table().last(),
            &rows(&["Mustang", "GT", "Civic", "Bronco"], None)
        );
        assert_eq!(dashboard.map().markers().count(), 2);
        assert!(dashboard.selection().is_all());
    }

    #[test]
    fn make_and_year_narrow_both_views() {
        let mut dashboard = dashboard();
        dashboard.handle(UiEvent::MakeChanged("Ford".to_string())).unwrap();
        dashboard.handle(UiEvent::YearChanged("1990-1999".to_string())).unwrap();

        assert_eq!(dashboard.table().last(), &rows(&["Mustang", "Bronco"], None));
        let labels: Vec<&str> = dashboard.map().markers().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["Austin, TX", "Detroit, MI"]);
    }

    #[test]
    fn changing_make_resets_model() {
        let mut dashboard = dashboard();
        dashboard.handle(UiEvent::MakeChanged("Ford".to_string())).unwrap();
        dashboard.handle(UiEvent::ModelChanged("GT".to_string())).unwrap();
        assert_eq!(dashboard.table().last(), &rows(&["GT"], None));

        dashboard.handle(UiEvent::MakeChanged("Honda".to_string())).unwrap();
        assert_eq!(dashboard.controller().model().value(), "All");
        assert_eq!(dashboard.table().last(), &rows(&["Civic"], None));
    }

    #[test]
    fn clear_restores_unfiltered_dataset() {
        let mut dashboard = dashboard();
        dashboard.handle(UiEvent::MakeChanged("Ford".to_string())).unwrap();
        dashboard.handle(UiEvent::ModelChanged("Mustang".to_string())).unwrap();
        dashboard.handle(UiEvent::YearChanged("1990-1999".to_string())).unwrap();
        assert_eq!(dashboard.map().markers().count(), 1);

        dashboard.handle(UiEvent::Clear).unwrap();
        assert!(dashboard.selection().is_all());
        assert_eq!(dashboard.map().markers().count(), 2);
        assert_eq!(dashboard.controller().model().options(), ["All"]);
        assert_eq!(dashboard.subset().len(), dashboard.dataset().len());
        assert_eq!(
            dashboard.table().last(),
            &rows(&["Mustang", "GT", "Civic", "Bronco"], None)
        );
    }

    #[test]
    fn empty_subset_renders_empty_views() {
        let mut dashboard = dashboard();
        dashboard.handle(UiEvent::MakeChanged("Honda".to_string())).unwrap();
        dashboard.handle(UiEvent::YearChanged("2010-2019".to_string())).unwrap();

        assert_eq!(dashboard.table().last(), &rows(&[], None));
        assert_eq!(dashboard.map().markers().count(), 0);
    }

    #[test]
    fn marker_click_lists_group_under_location() {
        let mut dashboard = dashboard();
        let detroit = marker_for(&dashboard, "Detroit, MI");

        dashboard.handle(UiEvent::MarkerClicked(detroit)).unwrap();
        assert_eq!(
            dashboard.table().last(),
            &rows(&["GT", "Bronco"], Some("Detroit, MI"))
        );
        assert_eq!(dashboard.map().active(), Some(detroit));
        assert!(dashboard.map().surface().popup(detroit).is_some());
    }

    #[test]
    fn background_click_shows_placeholder_and_keeps_markers() {
        let mut dashboard = dashboard();
        let austin = marker_for(&dashboard, "Austin, TX");
        dashboard.handle(UiEvent::MarkerClicked(austin)).unwrap();

        dashboard.handle(UiEvent::BackgroundClicked).unwrap();
        assert_eq!(
            dashboard.table().last(),
            &Shown::Placeholder(DashboardConfig::default().placeholder)
        );
        assert_eq!(dashboard.map().active(), None);
        assert!(dashboard.map().displayed_popups().is_empty());
        assert_eq!(dashboard.map().markers().count(), 2);
    }

    #[test]
    fn hover_then_leave_does_not_touch_table() {
        let mut dashboard = dashboard();
        let austin = marker_for(&dashboard, "Austin, TX");
        let before = dashboard.table().shown.len();

        dashboard.handle(UiEvent::MarkerEntered(austin)).unwrap();
        assert_eq!(dashboard.map().popup_state(austin), Some(PopupState::HoverShown));
        dashboard.handle(UiEvent::MarkerLeft(austin)).unwrap();
        assert_eq!(dashboard.map().popup_state(austin), Some(PopupState::Hidden));
        assert_eq!(dashboard.table().shown.len(), before);
    }

    #[test]
    fn peeking_at_another_marker_keeps_clicked_group() {
        let mut dashboard = dashboard();
        let austin = marker_for(&dashboard, "Austin, TX");
        let detroit = marker_for(&dashboard, "Detroit, MI");

        dashboard.handle(UiEvent::MarkerClicked(austin)).unwrap();
        dashboard.handle(UiEvent::MarkerEntered(detroit)).unwrap();
        assert!(dashboard.map().surface().popup(austin).is_none());
        dashboard.handle(UiEvent::MarkerLeft(detroit)).unwrap();

        assert_eq!(dashboard.map().active(), Some(austin));
        assert_eq!(dashboard.map().displayed_popups(), [austin]);
        assert!(dashboard.map().surface().popup(austin).is_some());
        assert_eq!(
            dashboard.table().last(),
            &rows(&["Mustang", "Civic"], Some("Austin, TX"))
        );
    }

    #[test]
    fn refiltering_drops_stale_markers() {
        let mut dashboard = dashboard();
        let detroit = marker_for(&dashboard, "Detroit, MI");
        dashboard.handle(UiEvent::MakeChanged("Honda".to_string())).unwrap();

        let err = dashboard.handle(UiEvent::MarkerClicked(detroit)).unwrap_err();
        assert_eq!(err, DashboardError::Map(MapError::UnknownMarker(detroit)));
    }

    #[test]
    fn unknown_option_leaves_state_unchanged() {
        let mut dashboard = dashboard();
        let shown = dashboard.table().shown.len();

        let err = dashboard
            .handle(UiEvent::MakeChanged("Tesla".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Control(ControlError::UnknownOption {
                control: ControlId::Make,
                ..
            })
        ));
        assert!(dashboard.selection().is_all());
        assert_eq!(dashboard.table().shown.len(), shown);
    }

    #[test]
    fn events_from_element_ids() {
        assert_eq!(
            UiEvent::from_element("make", "Ford").unwrap(),
            UiEvent::MakeChanged("Ford".to_string())
        );
        assert_eq!(UiEvent::from_element("clearButton", "").unwrap(), UiEvent::Clear);
        assert_eq!(
            UiEvent::from_element("results", "x").unwrap_err(),
            ControlError::UnknownControl("results".to_string())
        );
        assert_eq!(
            UiEvent::from_element("colour", "red").unwrap_err(),
            ControlError::UnknownControl("colour".to_string())
        );
    }
}
