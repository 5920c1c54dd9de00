//! Dropdown option derivation.
//!
//! Options are computed once from the full dataset at load time. Every list
//! starts with [`ALL`]; the remaining entries are sorted so that the
//! dropdowns read alphabetically no matter how the CSV is ordered.

use std::collections::BTreeMap;

use car_map_car_models::Dataset;
use car_map_filter_models::{ALL, Choice, YearSpan};

/// Distinct models of each make, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelsByMake {
    models: BTreeMap<String, Vec<String>>,
}

impl ModelsByMake {
    /// Collects the distinct `(make, model)` pairs of `dataset`. Records
    /// with an empty make or model are not offered.
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut models: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for record in dataset.records() {
            if record.make.is_empty() || record.model.is_empty() {
                continue;
            }
            let entry = models.entry(record.make.clone()).or_default();
            if !entry.contains(&record.model) {
                entry.push(record.model.clone());
            }
        }
        Self { models }
    }

    /// Distinct models of `make`, in first-seen order. Empty for unknown
    /// makes.
    #[must_use]
    pub fn models(&self, make: &str) -> &[String] {
        self.models.get(make).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Options for the model dropdown once `make` is selected: [`ALL`]
    /// followed by the make's models sorted ascending, or [`ALL`] alone when
    /// no make is selected.
    #[must_use]
    pub fn model_options(&self, make: &Choice) -> Vec<String> {
        match make {
            Choice::All => vec![ALL.to_string()],
            Choice::Value(make) => with_all_first(self.models(make).to_vec()),
        }
    }

    /// Number of makes with at least one model.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no make has a model.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Everything the three dropdowns can offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOptions {
    /// Make dropdown: [`ALL`] then the distinct makes, sorted.
    pub makes: Vec<String>,
    /// Source for the model dropdown, which depends on the selected make.
    pub models_by_make: ModelsByMake,
    /// Year dropdown: [`ALL`] then the bucket labels, oldest first.
    pub years: Vec<String>,
}

/// Derives the dropdown options for `dataset`.
#[must_use]
pub fn derive_options(dataset: &Dataset, span: YearSpan) -> DropdownOptions {
    let mut makes: Vec<String> = Vec::new();
    for record in dataset.records() {
        if !record.make.is_empty() && !makes.contains(&record.make) {
            makes.push(record.make.clone());
        }
    }

    let years = std::iter::once(ALL.to_string())
        .chain(span.buckets().iter().map(ToString::to_string))
        .collect();

    let options = DropdownOptions {
        makes: with_all_first(makes),
        models_by_make: ModelsByMake::from_dataset(dataset),
        years,
    };

    log::debug!(
        "Derived {} makes and {} year buckets",
        options.makes.len() - 1,
        options.years.len() - 1
    );

    options
}

/// Sorts `values` ascending and pins [`ALL`] in front. A literal `"All"`
/// value is folded into the sentinel.
fn with_all_first(mut values: Vec<String>) -> Vec<String> {
    values.retain(|value| value != ALL);
    values.sort();
    values.insert(0, ALL.to_string());
    values
}
