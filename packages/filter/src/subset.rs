//! Predicate evaluation.
//!
//! A record passes a [`FilterSelection`] when its make, model and year all
//! pass (logical AND). The result keeps dataset order and is recomputed in
//! full on every selection change.

use car_map_car_models::{CarRecord, Dataset, RecordId};
use car_map_filter_models::FilterSelection;

/// Whether `record` passes every part of `selection`.
#[must_use]
pub fn record_matches(selection: &FilterSelection, record: &CarRecord) -> bool {
    selection.make.matches(&record.make)
        && selection.model.matches(&record.model)
        && selection.year.matches(record.year_value)
}

/// The records of a dataset that pass the current selection, in dataset
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredSubset {
    ids: Vec<RecordId>,
}

impl FilteredSubset {
    /// The subset containing every record of `dataset`.
    #[must_use]
    pub fn everything(dataset: &Dataset) -> Self {
        Self {
            ids: dataset.ids().collect(),
        }
    }

    /// Ids of the matching records, in dataset order.
    #[must_use]
    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    /// Number of matching records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolves the subset against the dataset it was computed from.
    pub fn records<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a CarRecord> {
        dataset.resolve(&self.ids)
    }

    /// Applies `selection` again to the records of this subset only.
    #[must_use]
    pub fn refine(&self, dataset: &Dataset, selection: &FilterSelection) -> Self {
        Self {
            ids: self
                .ids
                .iter()
                .copied()
                .filter(|id| {
                    dataset
                        .get(*id)
                        .is_some_and(|record| record_matches(selection, record))
                })
                .collect(),
        }
    }
}

/// Filters the whole dataset with `selection`.
#[must_use]
pub fn apply(dataset: &Dataset, selection: &FilterSelection) -> FilteredSubset {
    let subset = FilteredSubset {
        ids: dataset
            .iter()
            .filter(|(_, record)| record_matches(selection, record))
            .map(|(id, _)| id)
            .collect(),
    };

    log::debug!(
        "Filter [{selection}] matched {} of {} records",
        subset.len(),
        dataset.len()
    );

    subset
}
