#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Car sightings dataset loader.
//!
//! Fetches the CSV (from disk or over HTTP, optionally gzip-compressed),
//! parses it using the header row for column names, and normalizes every
//! row into a [`CarRecord`] exactly once. Cells that fail to parse are
//! defaulted or dropped here so that nothing downstream has to re-validate:
//!
//! * rating columns default to `0`,
//! * `Year` keeps its raw text and gets a leading-integer `year_value`,
//! * `lat`/`lng` become a [`LngLat`](car_map_car_models::LngLat) or `None`.
//!
//! Every defaulted cell is counted in a [`LoadReport`] and logged at debug
//! level.

pub mod parsing;
pub mod progress;

use std::collections::BTreeMap;
use std::io::Read as _;
use std::path::PathBuf;
use std::sync::Arc;

use car_map_car_models::{CarRecord, Dataset, RatingField, Ratings};

use crate::parsing::{parse_leading_int, parse_lng_lat};
use crate::progress::ProgressCallback;

/// Columns without which a row cannot be filtered.
const REQUIRED_COLUMNS: &[&str] = &[COL_MAKE, COL_MODEL, COL_YEAR];

const COL_MAKE: &str = "Make";
const COL_MODEL: &str = "Model";
const COL_YEAR: &str = "Year";
const COL_CITY: &str = "Film_City";
const COL_STATE: &str = "Film_State";
const COL_LAT: &str = "lat";
const COL_LNG: &str = "lng";

/// Errors that can occur while loading the dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (file read or decompression).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a column the filters depend on.
    #[error("Dataset is missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },
}

/// Where to read the dataset from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A local CSV file.
    File(PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}

impl DatasetSource {
    /// Interprets `location` as a URL when it has an HTTP(S) scheme and as
    /// a file path otherwise.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// Whether the payload should be gunzipped before parsing.
    #[must_use]
    pub fn is_gzipped(&self) -> bool {
        match self {
            Self::File(path) => path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("gz")),
            Self::Url(url) => url
                .split(['?', '#'])
                .next()
                .is_some_and(|path| path.ends_with(".gz")),
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Counts of cells that were defaulted or dropped during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of data rows read.
    pub rows: usize,
    /// Rating cells that were blank or unparsable and stored as `0`.
    pub defaulted_ratings: usize,
    /// Rows whose `Year` has no leading integer.
    pub unparsable_years: usize,
    /// Rows without usable coordinates.
    pub missing_coordinates: usize,
    /// Optional columns absent from the header row.
    pub missing_columns: Vec<String>,
}

/// Fetches and parses the dataset.
///
/// # Errors
///
/// Returns [`DatasetError`] if the download or file read fails, the payload
/// cannot be decompressed, the CSV is malformed, or a required column is
/// missing.
pub async fn load(
    source: &DatasetSource,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(Dataset, LoadReport), DatasetError> {
    progress.set_message(format!("Loading {source}"));

    let bytes = match source {
        DatasetSource::File(path) => tokio::fs::read(path).await?,
        DatasetSource::Url(url) => {
            let response = reqwest::get(url).await?.error_for_status()?;
            response.bytes().await?.to_vec()
        }
    };

    log::debug!("Read {} bytes from {source}", bytes.len());

    let csv_bytes = if source.is_gzipped() {
        let mut decoder = flate2::read::GzDecoder::new(bytes.as_slice());
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;
        log::debug!("Decompressed to {} bytes", decompressed.len());
        decompressed
    } else {
        bytes
    };

    let (dataset, report) = parse_csv_with_progress(&csv_bytes, progress)?;

    log::info!(
        "Loaded {} records from {source} ({} ratings defaulted to 0, {} unparsable years, {} without coordinates)",
        report.rows,
        report.defaulted_ratings,
        report.unparsable_years,
        report.missing_coordinates,
    );
    progress.finish(format!("Loaded {} records", report.rows));

    Ok((dataset, report))
}

/// Parses and normalizes an in-memory CSV payload.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV is malformed or a required column is
/// missing.
pub fn parse_csv(bytes: &[u8]) -> Result<(Dataset, LoadReport), DatasetError> {
    parse_csv_with_progress(bytes, &progress::null_progress())
}

fn parse_csv_with_progress(
    bytes: &[u8],
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(Dataset, LoadReport), DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    // Rows spanning several lines make this an estimate.
    let lines = bytes.iter().filter(|b| **b == b'\n').count() as u64;
    progress.set_total(lines.saturating_sub(1));

    let columns = ColumnIndex::new(reader.headers()?)?;
    let mut report = LoadReport {
        missing_columns: columns.missing_optional(),
        ..LoadReport::default()
    };
    for column in &report.missing_columns {
        log::warn!("Dataset has no '{column}' column");
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map_or(0, csv::Position::line);
        records.push(normalize_row(&columns, &row, line, &mut report));
        progress.inc(1);
    }
    report.rows = records.len();

    Ok((Dataset::new(records), report))
}

/// Maps column names from the header row to their positions.
struct ColumnIndex {
    positions: BTreeMap<String, usize>,
}

impl ColumnIndex {
    fn new(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let mut positions = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            positions.entry(header.trim().to_owned()).or_insert(i);
        }

        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|column| !positions.contains_key(**column))
        {
            return Err(DatasetError::MissingColumn {
                column: (*missing).to_string(),
            });
        }

        Ok(Self { positions })
    }

    fn missing_optional(&self) -> Vec<String> {
        [COL_CITY, COL_STATE, COL_LAT, COL_LNG]
            .into_iter()
            .map(str::to_string)
            .chain(RatingField::all().iter().map(ToString::to_string))
            .filter(|column| !self.positions.contains_key(column))
            .collect()
    }

    fn get<'r>(&self, row: &'r csv::StringRecord, column: &str) -> Option<&'r str> {
        self.positions
            .get(column)
            .and_then(|i| row.get(*i))
            .map(str::trim)
    }
}

fn normalize_row(
    columns: &ColumnIndex,
    row: &csv::StringRecord,
    line: u64,
    report: &mut LoadReport,
) -> CarRecord {
    let text = |column: &str| columns.get(row, column).unwrap_or("").to_owned();

    let year = text(COL_YEAR);
    let year_value = parse_leading_int(&year);
    if year_value.is_none() {
        report.unparsable_years += 1;
        log::debug!("Line {line}: unparsable Year '{year}'");
    }

    let coordinates = parse_lng_lat(columns.get(row, COL_LAT), columns.get(row, COL_LNG));
    if coordinates.is_none() {
        report.missing_coordinates += 1;
        log::debug!("Line {line}: no usable lat/lng");
    }

    let mut ratings = Ratings::default();
    for field in RatingField::all() {
        let cell = columns.get(row, field.as_ref()).unwrap_or("");
        let value = parse_leading_int(cell).unwrap_or_else(|| {
            report.defaulted_ratings += 1;
            log::debug!("Line {line}: {field} '{cell}' defaulted to 0");
            0
        });
        ratings.set(*field, value);
    }

    CarRecord {
        make: text(COL_MAKE),
        model: text(COL_MODEL),
        year,
        year_value,
        film_city: text(COL_CITY),
        film_state: text(COL_STATE),
        coordinates,
        ratings,
    }
}
