#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Results table for the car map dashboard.
//!
//! The dashboard pushes rows into a [`TableSink`] whenever the filtered
//! subset changes or a map marker is clicked. Each call replaces whatever
//! the sink displayed before; sinks never hold on to the records.
//!
//! Two sinks are provided: [`HtmlTable`] renders the fragment that goes into
//! the page's `results` element, [`TextTable`] renders aligned plain text
//! for the terminal.

pub mod html;
pub mod text;

use car_map_car_models::CarRecord;
use strum_macros::{AsRefStr, Display};

pub use html::HtmlTable;
pub use text::TextTable;

/// Heading used when rows are not tied to a map location.
pub const ALL_RESULTS: &str = "All results";

/// Receives rows to display.
pub trait TableSink {
    /// Replaces the displayed content with `records`. `location` is the
    /// label of the map group the rows belong to; `None` means the rows are
    /// the whole filtered subset.
    fn show_records(&mut self, records: &[&CarRecord], location: Option<&str>);

    /// Replaces the displayed content with a placeholder message.
    fn show_placeholder(&mut self, message: &str);
}

/// The fixed column set, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum Column {
    Make,
    Model,
    Year,
    City,
    State,
}

impl Column {
    /// Returns all columns in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Make, Self::Model, Self::Year, Self::City, Self::State]
    }

    /// The cell text of this column for `record`.
    #[must_use]
    pub fn value(self, record: &CarRecord) -> String {
        match self {
            Self::Make => record.make.clone(),
            Self::Model => record.model.clone(),
            Self::Year => record.display_year(),
            Self::City => record.film_city.clone(),
            Self::State => record.film_state.clone(),
        }
    }
}

/// The heading shown above the rows.
#[must_use]
pub fn heading(location: Option<&str>, count: usize) -> String {
    let noun = if count == 1 { "car" } else { "cars" };
    format!("{} ({count} {noun})", location.unwrap_or(ALL_RESULTS))
}
