#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Car record types shared across the car map dashboard.
//!
//! A [`CarRecord`] is one row of the sightings dataset, already normalized
//! at the load boundary: ratings are integers, the model year is parsed,
//! and coordinates are either a valid [`LngLat`] or absent. Records live in
//! a [`Dataset`] and are addressed by [`RecordId`] so that filtered views
//! and location groups never copy them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One of the thirteen numeric rating columns of the dataset.
///
/// The string forms match the CSV header names exactly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RatingField {
    /// Exterior and interior styling
    Styling,
    /// Straight-line performance
    Acceleration,
    /// Cornering and steering feel
    Handling,
    /// How much fun the car is to drive
    #[serde(rename = "Fun Factor")]
    #[strum(serialize = "Fun Factor")]
    FunFactor,
    /// Street presence
    #[serde(rename = "Cool Factor")]
    #[strum(serialize = "Cool Factor")]
    CoolFactor,
    /// Sum of the weekend ratings
    #[serde(rename = "Total_Weekend")]
    #[strum(serialize = "Total_Weekend")]
    TotalWeekend,
    /// Equipment and technology
    Features,
    /// Ride and seat comfort
    Comfort,
    /// Build quality
    Quality,
    /// Everyday usability
    Practicality,
    /// Value for money
    Value,
    /// Sum of the daily-driver ratings
    #[serde(rename = "Total_Daily")]
    #[strum(serialize = "Total_Daily")]
    TotalDaily,
    /// Overall score
    #[serde(rename = "Total_Overall")]
    #[strum(serialize = "Total_Overall")]
    TotalOverall,
}

impl RatingField {
    /// Returns all variants of this enum, in CSV column order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Styling,
            Self::Acceleration,
            Self::Handling,
            Self::FunFactor,
            Self::CoolFactor,
            Self::TotalWeekend,
            Self::Features,
            Self::Comfort,
            Self::Quality,
            Self::Practicality,
            Self::Value,
            Self::TotalDaily,
            Self::TotalOverall,
        ]
    }
}

/// Integer ratings of a single car, keyed by [`RatingField`].
///
/// Fields that were never set read as `0`, which is also the value the
/// loader stores for unparsable cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ratings(BTreeMap<RatingField, i64>);

impl Ratings {
    /// Returns the rating for `field`, or `0` if it was never set.
    #[must_use]
    pub fn get(&self, field: RatingField) -> i64 {
        self.0.get(&field).copied().unwrap_or(0)
    }

    /// Sets the rating for `field`.
    pub fn set(&mut self, field: RatingField, value: i64) {
        self.0.insert(field, value);
    }

    /// Iterates over every rating field with its value, in column order.
    pub fn iter(&self) -> impl Iterator<Item = (RatingField, i64)> + '_ {
        RatingField::all().iter().map(|f| (*f, self.get(*f)))
    }
}

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// A single car sighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRecord {
    /// Manufacturer, e.g. `"Ford"`.
    pub make: String,
    /// Model name, e.g. `"GT"`.
    pub model: String,
    /// Model year exactly as it appeared in the source.
    pub year: String,
    /// Model year as an integer, `None` when the source value had no
    /// leading integer.
    pub year_value: Option<i64>,
    /// City where the car was filmed.
    pub film_city: String,
    /// State where the car was filmed.
    pub film_state: String,
    /// Filming location, `None` when `lat`/`lng` were missing or invalid.
    pub coordinates: Option<LngLat>,
    /// Numeric ratings.
    pub ratings: Ratings,
}

impl CarRecord {
    /// Year label for display: the normalized year when one was parsed,
    /// otherwise the raw source text.
    #[must_use]
    pub fn display_year(&self) -> String {
        self.year_value
            .map_or_else(|| self.year.clone(), |year| year.to_string())
    }
}

/// Position of a record inside its [`Dataset`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub usize);

/// The full, ordered set of records loaded at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<CarRecord>,
}

impl Dataset {
    #[must_use]
    pub const fn new(records: Vec<CarRecord>) -> Self {
        Self { records }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in load order.
    #[must_use]
    pub fn records(&self) -> &[CarRecord] {
        &self.records
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&CarRecord> {
        self.records.get(id.0)
    }

    /// Iterates over every record id, in load order.
    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        (0..self.records.len()).map(RecordId)
    }

    /// Iterates over `(id, record)` pairs, in load order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &CarRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (RecordId(i), record))
    }

    /// Resolves a sequence of ids to records, skipping ids that are out of
    /// range.
    pub fn resolve<'a>(
        &'a self,
        ids: impl IntoIterator<Item = &'a RecordId> + 'a,
    ) -> impl Iterator<Item = &'a CarRecord> + 'a {
        ids.into_iter().filter_map(|id| self.get(*id))
    }
}
