//! Interactive dashboard session.
//!
//! A `dialoguer` menu loop standing in for the page: every menu action turns
//! into a [`UiEvent`] for the [`Dashboard`], and the results table is
//! printed whenever it changes.

use car_map_car_models::Dataset;
use car_map_dashboard::{Dashboard, DashboardConfig, SelectControl, UiEvent};
use car_map_map::{GeoJsonSurface, MarkerId};
use car_map_table::TextTable;
use dialoguer::Select;

type TerminalDashboard = Dashboard<TextTable, GeoJsonSurface>;

/// Actions available in the session menu.
enum Action {
    ChooseMake,
    ChooseModel,
    ChooseYear,
    Clear,
    HoverMarker,
    ClickMarker,
    ClickBackground,
    ShowResults,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ChooseMake,
        Self::ChooseModel,
        Self::ChooseYear,
        Self::Clear,
        Self::HoverMarker,
        Self::ClickMarker,
        Self::ClickBackground,
        Self::ShowResults,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ChooseMake => "Choose make",
            Self::ChooseModel => "Choose model",
            Self::ChooseYear => "Choose year",
            Self::Clear => "Clear filters",
            Self::HoverMarker => "Peek at a location",
            Self::ClickMarker => "Open a location",
            Self::ClickBackground => "Close location",
            Self::ShowResults => "Show results",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the menu loop until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal prompt fails.
pub fn run(dataset: Dataset, config: &DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let surface = GeoJsonSurface::new(config.map.viewport);
    let mut dashboard = Dashboard::new(dataset, config, TextTable::new(), surface);

    println!("Car Map");
    println!();
    print!("{}", dashboard.table().text());

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!();
        println!(
            "{} | {} cars at {} locations",
            dashboard.selection(),
            dashboard.subset().len(),
            dashboard.map().markers().count()
        );

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let event = match Action::ALL[idx] {
            Action::ChooseMake => {
                choose(dashboard.controller().make()).map(UiEvent::MakeChanged)
            }
            Action::ChooseModel => {
                choose(dashboard.controller().model()).map(UiEvent::ModelChanged)
            }
            Action::ChooseYear => {
                choose(dashboard.controller().year()).map(UiEvent::YearChanged)
            }
            Action::Clear => Ok(UiEvent::Clear),
            Action::HoverMarker => {
                if let Some(id) = choose_marker(&dashboard)? {
                    peek(&mut dashboard, id)?;
                }
                continue;
            }
            Action::ClickMarker => match choose_marker(&dashboard)? {
                Some(id) => Ok(UiEvent::MarkerClicked(id)),
                None => continue,
            },
            Action::ClickBackground => Ok(UiEvent::BackgroundClicked),
            Action::ShowResults => {
                print!("{}", dashboard.table().text());
                continue;
            }
            Action::Quit => break,
        }?;

        if let Err(e) = dashboard.handle(event) {
            log::error!("{e}");
            continue;
        }
        print!("{}", dashboard.table().text());
    }

    Ok(())
}

/// Prompts for one of `control`'s options, starting on the current one.
fn choose(control: &SelectControl) -> dialoguer::Result<String> {
    let options = control.options();
    let current = options
        .iter()
        .position(|option| option == control.value())
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt(format!("Select {}", control.id()))
        .items(options)
        .default(current)
        .max_length(20)
        .interact()?;

    Ok(options[idx].clone())
}

/// Prompts for a marker on the map; `None` when the map is empty.
fn choose_marker(dashboard: &TerminalDashboard) -> dialoguer::Result<Option<MarkerId>> {
    let markers: Vec<(MarkerId, String)> = dashboard
        .map()
        .markers()
        .map(|marker| (marker.id, format!("{} ({})", marker.label, marker.count)))
        .collect();

    if markers.is_empty() {
        println!("No locations on the map.");
        return Ok(None);
    }

    let labels: Vec<&str> = markers.iter().map(|(_, label)| label.as_str()).collect();
    let idx = Select::new()
        .with_prompt("Location")
        .items(&labels)
        .default(0)
        .max_length(20)
        .interact()?;

    Ok(Some(markers[idx].0))
}

/// Moves the pointer over marker `id`, prints its popup, and moves it away.
fn peek(dashboard: &mut TerminalDashboard, id: MarkerId) -> Result<(), Box<dyn std::error::Error>> {
    dashboard.handle(UiEvent::MarkerEntered(id))?;
    if let Some((popup, _)) = dashboard.map().surface().popup(id) {
        println!("{}", popup.text());
    }
    dashboard.handle(UiEvent::MarkerLeft(id))?;
    Ok(())
}
