#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line host for the car map dashboard.
//!
//! Loads the dataset once, then either runs an interactive session that
//! plays the part of the web page (dropdowns, clear button, marker hover
//! and click, background click) or runs a single subcommand: list the
//! dropdown options, print a filtered table, or export a static page.
//!
//! Uses `indicatif-log-bridge` (via [`car_map_cli_utils::init_logger`]) so
//! log lines and the loading spinner never fight for the terminal.

mod export;
mod interactive;

use std::path::{Path, PathBuf};

use car_map_cli_utils::IndicatifProgress;
use car_map_dashboard::config::DEFAULT_CONFIG_FILE;
use car_map_dashboard::{ControlId, Dashboard, DashboardConfig, DashboardError, UiEvent};
use car_map_dataset::DatasetSource;
use car_map_filter::derive_options;
use car_map_filter_models::{ALL, Choice};
use car_map_map::{GeoJsonSurface, MapSurface};
use car_map_table::{HtmlTable, TableSink, TextTable};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "car_map", about = "Where were these cars filmed?")]
struct Cli {
    /// Configuration file (defaults to `car_map.toml` when it exists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Dataset path or URL (overrides the config file and `CAR_MAP_DATASET`)
    #[arg(long, global = true)]
    dataset: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the make, model and year dropdown options
    Options,
    /// Print the cars matching a selection
    Filter {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Write `index.html`, `results.html` and `markers.geojson` for a selection
    Export {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output directory
        #[arg(long, default_value = "site")]
        out: PathBuf,
    },
}

/// Dropdown values, exactly as the dropdowns label them.
#[derive(Args)]
struct SelectionArgs {
    #[arg(long, default_value = ALL)]
    make: String,
    #[arg(long, default_value = ALL)]
    model: String,
    /// Year bucket, e.g. "1990-1999"
    #[arg(long, default_value = ALL)]
    year: String,
}

impl SelectionArgs {
    /// Feeds the values to `dashboard` the way a user would pick them: make
    /// first, since it rebuilds the model options.
    fn apply<T: TableSink, S: MapSurface>(
        &self,
        dashboard: &mut Dashboard<T, S>,
    ) -> Result<(), DashboardError> {
        for (control, value) in [
            (ControlId::Make, &self.make),
            (ControlId::Model, &self.model),
            (ControlId::Year, &self.year),
        ] {
            dashboard.handle(UiEvent::from_element(control.as_ref(), value)?)?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = car_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let config_path = cli.config.or_else(|| {
        let default = Path::new(DEFAULT_CONFIG_FILE);
        default.exists().then(|| default.to_path_buf())
    });
    let mut config = DashboardConfig::load(config_path.as_deref())?;
    if let Some(dataset) = cli.dataset {
        config.dataset = dataset;
    }

    let source = DatasetSource::parse(&config.dataset);
    let progress = IndicatifProgress::rows_bar(&multi, "Loading dataset");
    let (dataset, report) = car_map_dataset::load(&source, &progress).await?;
    if !report.missing_columns.is_empty() {
        log::warn!("Missing columns: {}", report.missing_columns.join(", "));
    }

    let Some(command) = cli.command else {
        return interactive::run(dataset, &config);
    };

    match command {
        Commands::Options => {
            let options = derive_options(&dataset, config.years);
            println!("{:<20} MODELS", "MAKE");
            println!("{}", "-".repeat(50));
            for make in options.makes.iter().filter(|make| *make != ALL) {
                let models = options
                    .models_by_make
                    .model_options(&Choice::Value(make.clone()));
                println!("{make:<20} {}", models[1..].join(", "));
            }
            println!();
            println!("YEARS: {}", options.years.join(", "));
        }
        Commands::Filter { selection } => {
            let surface = GeoJsonSurface::new(config.map.viewport);
            let mut dashboard = Dashboard::new(dataset, &config, TextTable::new(), surface);
            selection.apply(&mut dashboard)?;
            print!("{}", dashboard.table().text());
        }
        Commands::Export { selection, out } => {
            let surface = GeoJsonSurface::new(config.map.viewport);
            let mut dashboard = Dashboard::new(dataset, &config, HtmlTable::new(), surface);
            selection.apply(&mut dashboard)?;
            export::write_site(&mut dashboard, &config, &out)?;
        }
    }

    Ok(())
}
