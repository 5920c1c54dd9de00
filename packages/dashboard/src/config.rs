//! Dashboard configuration.
//!
//! Read from an optional TOML file. Every field has a default, so an empty
//! file (or no file at all) yields [`DashboardConfig::default`]:
//!
//! ```toml
//! dataset = "ds_geo.csv"
//! placeholder = "Click a marker to see the cars filmed there."
//!
//! [years]
//! start = 1980
//! end = 2025
//!
//! [map]
//! style = "mapbox://styles/mapbox/streets-v11"
//! popup_offset = 25.0
//!
//! [map.viewport]
//! center = [-98.5795, 39.8283]
//! zoom = 4.0
//!
//! [map.colors]
//! low = "#ffffb2"
//! high = "#bd0026"
//! ```
//!
//! The `CAR_MAP_DATASET` and `MAPBOX_ACCESS_TOKEN` environment variables
//! override the file.

use std::path::{Path, PathBuf};

use car_map_filter_models::YearSpan;
use car_map_map::view::DEFAULT_POPUP_GAP;
use car_map_map::{ColorScale, Viewport};
use serde::{Deserialize, Serialize};

/// Default file name looked up by the CLI.
pub const DEFAULT_CONFIG_FILE: &str = "car_map.toml";

/// Overrides [`DashboardConfig::dataset`].
pub const DATASET_ENV: &str = "CAR_MAP_DATASET";

/// Overrides [`MapConfig::access_token`].
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

const DEFAULT_DATASET: &str = "ds_geo.csv";
const DEFAULT_STYLE: &str = "mapbox://styles/mapbox/streets-v11";
const DEFAULT_PLACEHOLDER: &str = "Click a marker to see the cars filmed there.";

/// Errors that can occur while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`DashboardConfig`].
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Path or URL of the CSV dataset.
    pub dataset: String,
    /// Years covered by the year dropdown.
    pub years: YearSpan,
    pub map: MapConfig,
    /// Message shown in the results area when no marker is selected.
    pub placeholder: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset: DEFAULT_DATASET.to_string(),
            years: YearSpan::default(),
            map: MapConfig::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Map widget settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Map provider style URL.
    pub style: String,
    /// Map provider access token; only the exported page needs it.
    pub access_token: Option<String>,
    pub viewport: Viewport,
    /// Gap in pixels between a marker and its popup.
    pub popup_offset: f64,
    pub colors: ColorScale,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style: DEFAULT_STYLE.to_string(),
            access_token: None,
            viewport: Viewport::default(),
            popup_offset: DEFAULT_POPUP_GAP,
            colors: ColorScale::default(),
        }
    }
}

impl DashboardConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// * If the text is not valid TOML or a field has the wrong type
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the configuration from `path`, or the defaults when `path` is
    /// `None`, then applies the environment overrides.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read
    /// * If the file is not valid TOML
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                log::debug!("Loaded configuration from {}", path.display());
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies [`DATASET_ENV`] and [`ACCESS_TOKEN_ENV`] as looked up by
    /// `lookup`. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dataset) = non_empty(DATASET_ENV) {
            log::debug!("{DATASET_ENV} overrides dataset with {dataset}");
            self.dataset = dataset;
        }
        if let Some(token) = non_empty(ACCESS_TOKEN_ENV) {
            self.map.access_token = Some(token);
        }
    }
}
