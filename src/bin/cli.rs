//! firemap CLI - Debug tool for detection clustering and map measurements
//!
//! Usage:
//!   firemap-cli cluster <geojson> --zoom <z> [--bbox w,s,e,n] [--config <json>]
//!   firemap-cli measure <distance|area> <lat,lon>...
//!   firemap-cli fit <geojson> [--padding x,y]
//!
//! This tool loads GeoJSON detection exports and prints what the map
//! would render, which helps tune cluster settings against real data.

use clap::{Parser, Subcommand, ValueEnum};
use firemap::{
    detections::extract_lat_lngs, format_area_square_meters, format_distance_meters,
    parse_feature_collection, to_detection_points, AutoFit, ClusterConfig, ClusterIndex,
    ClusterItem, ClusterSize, FeatureCollection, FireMapError, LatLng, MeasurementEngine,
    MeasurementMode, OptionExt, Result,
};
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "firemap-cli")]
#[command(about = "Debug tool for wildfire detection clustering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster detections and print the markers visible at a zoom level
    Cluster {
        /// GeoJSON FeatureCollection of detections
        file: PathBuf,

        /// Zoom level to render
        #[arg(short, long)]
        zoom: i32,

        /// Bounding box as west,south,east,north (defaults to the whole world)
        #[arg(short, long, allow_hyphen_values = true)]
        bbox: Option<String>,

        /// JSON file with cluster settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Measure a distance or area over lat,lon points
    Measure {
        /// What to measure
        #[arg(value_enum)]
        mode: ModeArg,

        /// Points as lat,lon
        #[arg(required = true, allow_hyphen_values = true)]
        points: Vec<String>,
    },

    /// Print the auto-fit request for a detection file
    Fit {
        /// GeoJSON FeatureCollection of detections
        file: PathBuf,

        /// Padding in pixels as x,y
        #[arg(short, long)]
        padding: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Distance,
    Area,
}

impl From<ModeArg> for MeasurementMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Distance => MeasurementMode::Distance,
            ModeArg::Area => MeasurementMode::Area,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let result = match cli.command {
        Commands::Cluster {
            file,
            zoom,
            bbox,
            config,
        } => run_cluster(&file, zoom, bbox.as_deref(), config.as_deref()),
        Commands::Measure { mode, points } => run_measure(mode.into(), &points),
        Commands::Fit { file, padding } => run_fit(&file, padding.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load a GeoJSON detection file
fn load_collection(path: &Path) -> Result<FeatureCollection> {
    let content = fs::read_to_string(path)?;
    let collection = parse_feature_collection(&content)?;
    info!(
        "Loaded {} features from {}",
        collection.features.len(),
        path.display()
    );
    Ok(collection)
}

/// Parse comma-separated floats, requiring exactly `N` of them
fn parse_floats<const N: usize>(raw: &str, what: &str) -> Result<[f64; N]> {
    let values: Vec<f64> = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| FireMapError::InvalidArgument(format!("{} '{}': {}", what, raw, e)))?;

    <[f64; N]>::try_from(values).ok().ok_or_invalid_argument(format!(
        "{} '{}' needs {} comma-separated numbers",
        what, raw, N
    ))
}

fn run_cluster(
    file: &Path,
    zoom: i32,
    bbox: Option<&str>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => serde_json::from_str::<ClusterConfig>(&fs::read_to_string(path)?)?,
        None => ClusterConfig::default(),
    };
    debug!("Cluster config: {:?}", config);

    let bbox = match bbox {
        Some(raw) => parse_floats::<4>(raw, "bbox")?,
        None => [-180.0, -90.0, 180.0, 90.0],
    };

    let collection = load_collection(file)?;
    let points = to_detection_points(&collection);
    let index = ClusterIndex::build(&points, config);
    let items = index.query(bbox, zoom);

    println!("\n{}", "=".repeat(60));
    println!(
        "{} detections -> {} markers at zoom {}",
        index.len(),
        items.len(),
        zoom
    );
    println!("{}", "=".repeat(60));

    for item in &items {
        let (lng, lat) = item.coordinates();
        match *item {
            ClusterItem::Cluster {
                id,
                point_count,
                aggregate_weight,
                ..
            } => {
                let expands_at = index
                    .expansion_zoom(id)
                    .map_or_else(|| "-".to_string(), |z| z.to_string());
                println!(
                    "  cluster {:>10}  ({:>9.4}, {:>8.4})  {:>6} fires [{}]  frp {:>10.1}  expands at z{}",
                    id,
                    lng,
                    lat,
                    point_count,
                    ClusterSize::from_count(point_count).label(),
                    aggregate_weight,
                    expands_at
                );
            }
            ClusterItem::Leaf {
                id, weight, ..
            } => {
                println!(
                    "  fire    {:>10}  ({:>9.4}, {:>8.4})  frp {:.1}",
                    id, lng, lat, weight
                );
            }
        }
    }

    Ok(())
}

fn run_measure(mode: MeasurementMode, raw_points: &[String]) -> Result<()> {
    let mut engine = MeasurementEngine::new();
    engine.start(mode);

    for raw in raw_points {
        let [lat, lng] = parse_floats::<2>(raw, "point")?;
        engine.add_point(LatLng::new(lat, lng));
    }
    engine.try_complete()?;

    let label = match mode {
        MeasurementMode::Distance => format_distance_meters(engine.length_meters()),
        MeasurementMode::Area => format_area_square_meters(engine.area_square_meters()),
    };
    println!("{} over {} points: {}", mode, engine.points().len(), label);

    Ok(())
}

fn run_fit(file: &Path, padding: Option<&str>) -> Result<()> {
    let padding = padding
        .map(|raw| parse_floats::<2>(raw, "padding"))
        .transpose()?;

    let collection = load_collection(file)?;
    let mut auto_fit = AutoFit::new();
    if !auto_fit.request_for_points(&extract_lat_lngs(&collection), padding) {
        return Err(FireMapError::InvalidArgument(format!(
            "{} contains no valid point detections",
            file.display()
        )));
    }

    if let Some(request) = auto_fit.take() {
        println!("{}", serde_json::to_string_pretty(&request)?);
    }

    Ok(())
}
