#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Operator CLI for the dengue surveillance analysis core.
//!
//! Loads a boundary `GeoJSON` file plus optional validated-report,
//! death-count, and intervention files, then answers one query against the
//! assembled engine: coordinate resolution, district status, weekly
//! series, or intervention effectiveness. Output is pretty-printed JSON on
//! stdout; diagnostics go to the logger.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dengue_watch_analytics_models::{DistrictStatus, InterventionRecord};
use dengue_watch_boundary::BoundaryStore;
use dengue_watch_boundary_models::BoundaryFieldMapping;
use dengue_watch_engine::feeds::{StaticDeathFeed, StaticInterventions};
use dengue_watch_engine::{AnalysisConfig, SurveillanceEngine};
use dengue_watch_report_models::IncomingReport;
use uuid::Uuid;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "dengue-watch", about = "Dengue surveillance analysis toolchain")]
struct Cli {
    /// Boundary GeoJSON FeatureCollection file.
    #[arg(long)]
    boundaries: PathBuf,

    /// Feature property holding the district name.
    #[arg(long, default_value = "name")]
    name_property: String,

    /// Validated reports JSON file (array of report events).
    #[arg(long)]
    reports: Option<PathBuf>,

    /// Unresolved death report counts JSON file (district name → count).
    #[arg(long)]
    deaths: Option<PathBuf>,

    /// Intervention records JSON file (array).
    #[arg(long)]
    interventions: Option<PathBuf>,

    /// Analysis thresholds TOML override.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a coordinate to its owning district.
    Resolve {
        /// Longitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Latitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
    },
    /// Print district statuses (all districts unless --district is given).
    Status {
        /// District name, matched by normalized name.
        #[arg(long)]
        district: Option<String>,
    },
    /// Print a district's weekly series.
    Series {
        /// District name, matched by normalized name.
        #[arg(long)]
        district: String,
        /// Number of completed weeks to include.
        #[arg(long, default_value_t = 8)]
        weeks: u32,
    },
    /// Analyze a completed intervention's effectiveness.
    Effectiveness {
        /// Intervention id.
        #[arg(long)]
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::embedded_default(),
    };

    let payload = std::fs::read_to_string(&cli.boundaries)?;
    let fields = BoundaryFieldMapping::new(cli.name_property.clone());
    let store = Arc::new(BoundaryStore::from_geojson(&payload, &fields)?);

    let death_feed = Arc::new(load_death_feed(cli.deaths.as_deref(), &store)?);
    let interventions = Arc::new(load_interventions(cli.interventions.as_deref())?);

    let engine = SurveillanceEngine::new(store, config, death_feed, interventions);

    if let Some(path) = &cli.reports {
        let reports: Vec<IncomingReport> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        engine.ingest_batch(reports.iter());
    }

    match cli.command {
        Command::Resolve { lon, lat } => {
            let district = engine.resolve_district(lon, lat);
            print_json(&serde_json::json!({ "district": district }))?;
        }
        Command::Status { district } => {
            let as_of = chrono::Utc::now().date_naive();
            engine.recompute_all(as_of).await;

            match district {
                Some(name) => match engine.district_status(&name) {
                    Some(status) => print_json(status.as_ref())?,
                    None => {
                        log::error!("No status for district '{name}'");
                        std::process::exit(1);
                    }
                },
                None => {
                    let statuses = engine.all_statuses();
                    let statuses: Vec<&DistrictStatus> =
                        statuses.iter().map(AsRef::as_ref).collect();
                    print_json(&statuses)?;
                }
            }
        }
        Command::Series { district, weeks } => {
            print_json(&engine.weekly_series(&district, weeks))?;
        }
        Command::Effectiveness { id } => {
            print_json(&engine.effectiveness(id)?)?;
        }
    }

    Ok(())
}

/// Loads the static death feed, mapping externally spelled district names
/// onto the boundary file's canonical ones.
fn load_death_feed(
    path: Option<&std::path::Path>,
    store: &BoundaryStore,
) -> Result<StaticDeathFeed, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(StaticDeathFeed::default());
    };

    let counts: BTreeMap<String, u64> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    Ok(StaticDeathFeed::new(counts.into_iter().map(
        |(name, count)| {
            let canonical = store
                .lookup(&name)
                .map_or_else(|| name.clone(), |boundary| boundary.name.clone());
            (canonical, count)
        },
    )))
}

fn load_interventions(
    path: Option<&std::path::Path>,
) -> Result<StaticInterventions, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(StaticInterventions::default());
    };

    let records: Vec<InterventionRecord> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    Ok(StaticInterventions::new(records))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
