//! Headless model of the page's controls.
//!
//! A [`SelectControl`] behaves like an HTML `<select>`: it holds an ordered
//! option list and one selected option, and replacing its options resets
//! the selection to the first one.

use strum_macros::{AsRefStr, Display, EnumString};

/// Element identifiers shared with the page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum ControlId {
    /// Make dropdown.
    Make,
    /// Model dropdown.
    Model,
    /// Year dropdown.
    Year,
    /// Button resetting every dropdown.
    ClearButton,
    /// Map container.
    Map,
    /// Results table container.
    Results,
}

/// Errors raised by control interactions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// The value is not one of the control's options.
    #[error("'{value}' is not an option of #{control}")]
    UnknownOption {
        /// Control that rejected the value.
        control: ControlId,
        /// Rejected value.
        value: String,
    },
    /// The element id names no control, or a control that cannot take a
    /// value.
    #[error("No control accepts values at #{0}")]
    UnknownControl(String),
}

/// A dropdown with an ordered option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    id: ControlId,
    options: Vec<String>,
    selected: usize,
}

impl SelectControl {
    /// An empty dropdown.
    #[must_use]
    pub const fn new(id: ControlId) -> Self {
        Self {
            id,
            options: Vec::new(),
            selected: 0,
        }
    }

    /// Element id of this control.
    #[must_use]
    pub const fn id(&self) -> ControlId {
        self.id
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Adds `options`. With `clear`, existing options are removed first
    /// and the selection falls back to the first option; otherwise the
    /// current selection is kept.
    pub fn populate(&mut self, options: &[String], clear: bool) {
        if clear {
            self.options.clear();
            self.selected = 0;
        }
        self.options.extend_from_slice(options);
    }

    /// The selected option, or `""` when the control has no options.
    #[must_use]
    pub fn value(&self) -> &str {
        self.options.get(self.selected).map_or("", String::as_str)
    }

    /// Selects the option equal to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownOption`] if no option equals `value`;
    /// the selection is left unchanged.
    pub fn select(&mut self, value: &str) -> Result<(), ControlError> {
        let index = self
            .options
            .iter()
            .position(|option| option == value)
            .ok_or_else(|| ControlError::UnknownOption {
                control: self.id,
                value: value.to_string(),
            })?;
        self.selected = index;
        Ok(())
    }

    /// Selects the first option.
    pub const fn reset(&mut self) {
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn element_ids_match_page_markup() {
        let ids: Vec<String> = [
            ControlId::Make,
            ControlId::Model,
            ControlId::Year,
            ControlId::ClearButton,
            ControlId::Map,
            ControlId::Results,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(ids, ["make", "model", "year", "clearButton", "map", "results"]);
        assert_eq!("clearButton".parse::<ControlId>().unwrap(), ControlId::ClearButton);
    }

    #[test]
    fn empty_control_has_empty_value() {
        let control = SelectControl::new(ControlId::Make);
        assert_eq!(control.value(), "");
    }

    #[test]
    fn first_option_is_selected_by_default() {
        let mut control = SelectControl::new(ControlId::Make);
        control.populate(&options(&["All", "Ford"]), false);
        assert_eq!(control.value(), "All");
    }

    #[test]
    fn repopulating_with_clear_resets_selection() {
        let mut control = SelectControl::new(ControlId::Model);
        control.populate(&options(&["All", "GT", "Mustang"]), false);
        control.select("Mustang").unwrap();

        control.populate(&options(&["All", "Civic"]), true);
        assert_eq!(control.options(), ["All", "Civic"]);
        assert_eq!(control.value(), "All");
    }

    #[test]
    fn appending_keeps_selection() {
        let mut control = SelectControl::new(ControlId::Model);
        control.populate(&options(&["All", "GT"]), false);
        control.select("GT").unwrap();
        control.populate(&options(&["Mustang"]), false);
        assert_eq!(control.value(), "GT");
        assert_eq!(control.options().len(), 3);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut control = SelectControl::new(ControlId::Year);
        control.populate(&options(&["All", "1990-1999"]), false);
        control.select("1990-1999").unwrap();

        let err = control.select("1970-1979").unwrap_err();
        assert_eq!(
            err,
            ControlError::UnknownOption {
                control: ControlId::Year,
                value: "1970-1979".to_string(),
            }
        );
        assert_eq!(err.to_string(), "'1970-1979' is not an option of #year");
        assert_eq!(control.value(), "1990-1999");
    }
}
