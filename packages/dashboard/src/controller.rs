use car_map_filter::{DropdownOptions, ModelsByMake};
use car_map_filter_models::{ALL, Choice, FilterSelection};

use crate::controls::{ControlError, ControlId, SelectControl};

/// Binds the make, model and year dropdowns to a [`FilterSelection`].
///
/// The model dropdown depends on the make: changing the make replaces the
/// model options with `"All"` plus that make's models and resets the model
/// to `"All"`. The controller only tracks control state; re-filtering is the
/// caller's job.
#[derive(Debug, Clone)]
pub struct DropdownController {
    make: SelectControl,
    model: SelectControl,
    year: SelectControl,
    models_by_make: ModelsByMake,
}

impl DropdownController {
    /// Populates the three dropdowns from `options`, every one on `"All"`.
    #[must_use]
    pub fn new(options: DropdownOptions) -> Self {
        let mut make = SelectControl::new(ControlId::Make);
        make.populate(&options.makes, true);

        let mut model = SelectControl::new(ControlId::Model);
        model.populate(&[ALL.to_string()], true);

        let mut year = SelectControl::new(ControlId::Year);
        year.populate(&options.years, true);

        Self {
            make,
            model,
            year,
            models_by_make: options.models_by_make,
        }
    }

    /// Selects `value` in the make dropdown and rebuilds the model options.
    ///
    /// # Errors
    ///
    /// * If `value` is not a make option
    pub fn change_make(&mut self, value: &str) -> Result<(), ControlError> {
        self.make.select(value)?;
        let models = self.models_by_make.model_options(&Choice::from_label(value));
        self.model.populate(&models, true);
        log::debug!("Make changed to '{value}', {} model options", models.len());
        Ok(())
    }

    /// Selects `value` in the model dropdown.
    ///
    /// # Errors
    ///
    /// * If `value` is not a model option for the current make
    pub fn change_model(&mut self, value: &str) -> Result<(), ControlError> {
        self.model.select(value)
    }

    /// Selects `value` in the year dropdown.
    ///
    /// # Errors
    ///
    /// * If `value` is not a year bucket label or `"All"`
    pub fn change_year(&mut self, value: &str) -> Result<(), ControlError> {
        self.year.select(value)
    }

    /// Puts every dropdown back on `"All"` and shrinks the model options to
    /// `["All"]`.
    pub fn clear(&mut self) {
        self.make.reset();
        self.model.populate(&[ALL.to_string()], true);
        self.year.reset();
    }

    /// The selection the dropdowns currently describe.
    #[must_use]
    pub fn selection(&self) -> FilterSelection {
        FilterSelection::from_labels(self.make.value(), self.model.value(), self.year.value())
    }

    #[must_use]
    pub const fn make(&self) -> &SelectControl {
        &self.make
    }

    #[must_use]
    pub const fn model(&self) -> &SelectControl {
        &self.model
    }

    #[must_use]
    pub const fn year(&self) -> &SelectControl {
        &self.year
    }

    /// Looks up a dropdown by element id; `None` for non-select elements.
    #[must_use]
    pub const fn control(&self, id: ControlId) -> Option<&SelectControl> {
        match id {
            ControlId::Make => Some(&self.make),
            ControlId::Model => Some(&self.model),
            ControlId::Year => Some(&self.year),
            ControlId::ClearButton | ControlId::Map | ControlId::Results => None,
        }
    }
}
