#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filtering core of the car map dashboard.
//!
//! [`options`] derives what the three dropdowns offer from the loaded
//! dataset; [`subset`] evaluates a
//! [`FilterSelection`](car_map_filter_models::FilterSelection) against the
//! dataset to produce the [`FilteredSubset`] both views render from.

pub mod options;
pub mod subset;

pub use options::{DropdownOptions, ModelsByMake, derive_options};
pub use subset::{FilteredSubset, apply, record_matches};
