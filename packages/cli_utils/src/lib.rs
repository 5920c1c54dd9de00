#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing shared by the car map binaries.
//!
//! [`init_logger`] routes `log` output through `indicatif-log-bridge`, and
//! [`IndicatifProgress`] draws dataset loading progress on the returned
//! [`MultiProgress`], so log lines never tear the spinner.

use std::sync::Arc;
use std::time::Duration;

use car_map_dataset::progress::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const ROWS_TEMPLATE: &str = "  {msg} {wide_bar:.cyan/dim} {pos}/{len} rows [{eta}]";
const TICK: Duration = Duration::from_millis(100);

/// Dataset loading progress drawn with `indicatif`.
pub struct IndicatifProgress {
    bar: ProgressBar,
    rows_style: ProgressStyle,
}

impl IndicatifProgress {
    /// Spins while the CSV is fetched, then counts parsed rows once the
    /// loader reports how many to expect.
    #[must_use]
    pub fn rows_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(TICK);

        let rows_style = ProgressStyle::with_template(ROWS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        Arc::new(Self { bar, rows_style })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_style(self.rows_style.clone());
        self.bar.set_length(total);
        self.bar.reset();
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs `pretty_env_logger` (configured by `RUST_LOG`) behind
/// `indicatif-log-bridge` and returns the [`MultiProgress`] that progress
/// bars must be drawn on.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let max_level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(max_level);
    }

    multi
}
