#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter selection types for the car map dashboard.
//!
//! Every dropdown holds either the [`ALL`] sentinel or a concrete value.
//! [`Choice`] models the make and model dropdowns, [`YearFilter`] the year
//! dropdown, whose concrete values are decade [`YearBucket`] labels such as
//! `"1990-1999"`. Together they form a [`FilterSelection`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label of the "no filter" option, always listed first in every dropdown.
pub const ALL: &str = "All";

/// Width of a generated year bucket.
pub const DECADE: i64 = 10;

/// A dropdown value: the [`ALL`] sentinel or a concrete option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Choice {
    /// Matches every value.
    #[default]
    All,
    /// Matches only this exact, case-sensitive value.
    Value(String),
}

impl Choice {
    /// Maps a dropdown label to a choice; `"All"` is the sentinel.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label == ALL {
            Self::All
        } else {
            Self::Value(label.to_string())
        }
    }

    /// The dropdown label for this choice.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Value(value) => value,
        }
    }

    /// Whether `value` passes this choice.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Value(expected) => expected == value,
        }
    }
}

impl From<String> for Choice {
    fn from(label: String) -> Self {
        if label == ALL {
            Self::All
        } else {
            Self::Value(label)
        }
    }
}

impl From<Choice> for String {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::All => ALL.to_string(),
            Choice::Value(value) => value,
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An inclusive range of model years, labelled `"{start}-{end}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearBucket {
    /// First year in the bucket.
    pub start: i64,
    /// Last year in the bucket (inclusive).
    pub end: i64,
}

impl YearBucket {
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// The ten-year bucket starting at `start`, cut short at `i64::MAX`.
    #[must_use]
    pub const fn decade(start: i64) -> Self {
        Self::new(start, start.saturating_add(DECADE - 1))
    }

    /// Whether `year` falls inside the bucket, bounds included.
    #[must_use]
    pub const fn contains(self, year: i64) -> bool {
        self.start <= year && year <= self.end
    }
}

impl std::fmt::Display for YearBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Error returned when a label is not of the form `"{start}-{end}"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid year bucket '{label}': expected START-END")]
pub struct InvalidYearBucketError {
    /// The label that failed to parse.
    pub label: String,
}

impl FromStr for YearBucket {
    type Err = InvalidYearBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidYearBucketError {
            label: s.to_string(),
        };
        let (start, end) = s.split_once('-').ok_or_else(err)?;
        let start = start.trim().parse().map_err(|_| err())?;
        let end = end.trim().parse().map_err(|_| err())?;
        Ok(Self::new(start, end))
    }
}

/// The year dropdown's effective filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum YearFilter {
    /// Matches every record, including those without a parsed year.
    #[default]
    All,
    /// Matches records whose year lies in the bucket.
    Range(YearBucket),
    /// A label that is neither `"All"` nor a bucket; matches nothing.
    Unparsable(String),
}

impl YearFilter {
    /// Maps a dropdown label to a year filter.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label == ALL {
            return Self::All;
        }
        label
            .parse()
            .map_or_else(|_| Self::Unparsable(label.to_string()), Self::Range)
    }

    /// The dropdown label for this filter.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::All => ALL.to_string(),
            Self::Range(bucket) => bucket.to_string(),
            Self::Unparsable(label) => label.clone(),
        }
    }

    /// Whether a record with the given normalized year passes. Records
    /// without a year only pass [`YearFilter::All`].
    #[must_use]
    pub const fn matches(&self, year: Option<i64>) -> bool {
        match (self, year) {
            (Self::All, _) => true,
            (Self::Range(bucket), Some(year)) => bucket.contains(year),
            (Self::Range(_) | Self::Unparsable(_), _) => false,
        }
    }
}

/// The configured range of years offered in the year dropdown.
///
/// Buckets start at `start` and advance by [`DECADE`] while the bucket
/// start is `<= end`, so the last bucket may extend past `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearSpan {
    /// First year of the first bucket.
    pub start: i64,
    /// Last year that must be covered.
    pub end: i64,
}

impl Default for YearSpan {
    fn default() -> Self {
        Self {
            start: 1980,
            end: 2025,
        }
    }
}

impl YearSpan {
    /// The decade buckets covering this span, oldest first.
    #[must_use]
    pub fn buckets(self) -> Vec<YearBucket> {
        std::iter::successors(Some(self.start), |year| year.checked_add(DECADE))
            .take_while(|year| *year <= self.end)
            .map(YearBucket::decade)
            .collect()
    }
}

/// The current make/model/year selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterSelection {
    /// Selected make.
    pub make: Choice,
    /// Selected model.
    pub model: Choice,
    /// Selected year bucket.
    pub year: YearFilter,
}

impl FilterSelection {
    /// The selection that matches every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a selection from the three dropdown labels.
    #[must_use]
    pub fn from_labels(make: &str, model: &str, year: &str) -> Self {
        Self {
            make: Choice::from_label(make),
            model: Choice::from_label(model),
            year: YearFilter::from_label(year),
        }
    }

    /// Whether every dropdown is on `"All"`.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.make == Choice::All && self.model == Choice::All && self.year == YearFilter::All
    }
}

impl std::fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "make={} model={} year={}",
            self.make,
            self.model,
            self.year.label()
        )
    }
}
