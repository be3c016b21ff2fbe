use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use kml2layers::config::{
    DEFAULT_POINTS_COLLECTION, DEFAULT_POLYGONS_COLLECTION, DEFAULT_SPATIAL_REFERENCE,
    DEFAULT_WORKSPACE, FileConfig,
};
use kml2layers::error::ConvertError;
use kml2layers::extract::{run_point_pass, run_polygon_pass};
use kml2layers::kml;
use kml2layers::sink::{CollectionWriter, GeoJsonSink, GeometryKind};

/// Split a KML file into point and polygon feature layers
///
/// Reads named placemarks and rectangular ground overlays from a KML document
/// and writes them out as two GeoJSON collections: one of points, one of
/// 4-corner polygons. Both collections are deleted and rebuilt on every run.
///
/// Examples:
///   # Convert a map into ./locations.geojson and ./overlays.geojson
///   kml2layers middle-earth.kml
///
///   # Put the layers in a separate directory under custom names
///   kml2layers middle-earth.kml -w out --points cities --polygons realms
///
///   # Use a config file
///   kml2layers --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "kml2layers")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the input KML file
    input: Option<PathBuf>,

    /// Path to config file (optional, auto-searches kml2layers.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for the generated layers
    #[arg(short = 'w', long)]
    workspace: Option<PathBuf>,

    /// Name of the point collection
    #[arg(long)]
    points: Option<String>,

    /// Name of the polygon collection
    #[arg(long)]
    polygons: Option<String>,

    /// Spatial reference of the input coordinates (must be a WGS 84 equivalent)
    #[arg(long)]
    spatial_ref: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            Some(toml::from_str(&contents).context("Failed to parse config file")?)
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load()
    };

    let input = args
        .input
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.input.clone()));
    let workspace = args
        .workspace
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.workspace.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKSPACE));
    let points_collection = args
        .points
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.points_collection.clone()))
        .unwrap_or_else(|| DEFAULT_POINTS_COLLECTION.to_string());
    let polygons_collection = args
        .polygons
        .clone()
        .or_else(|| {
            file_config
                .as_ref()
                .and_then(|c| c.polygons_collection.clone())
        })
        .unwrap_or_else(|| DEFAULT_POLYGONS_COLLECTION.to_string());
    let spatial_reference = args
        .spatial_ref
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.spatial_reference.clone()))
        .unwrap_or_else(|| DEFAULT_SPATIAL_REFERENCE.to_string());
    let verbose = args.verbose || file_config.as_ref().map(|c| c.verbose).unwrap_or(false);

    let Some(input) = input else {
        bail!("Must provide an input KML file (as an argument or in the config file)");
    };

    println!("kml2layers - KML to Feature Layers");
    println!("==================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Input: {}", input.display());
        println!("  Workspace: {}", workspace.display());
        println!("  Points collection: {}", points_collection);
        println!("  Polygons collection: {}", polygons_collection);
        println!("  Spatial reference: {}", spatial_reference);
        println!();
    }

    // Loader stage. Any failure here is fatal: no output collection is
    // touched before the document parses.
    let spinner = create_spinner("Parsing KML document...");
    let start = Instant::now();
    let doc = kml::load(&input).context("Failed to load KML document")?;
    spinner.finish_with_message(format!(
        "Found {} placemarks and {} ground overlays [{:.1}s]",
        doc.placemarks.len(),
        doc.overlays.len(),
        start.elapsed().as_secs_f32()
    ));

    let sink = GeoJsonSink::new(&workspace, &spatial_reference)
        .context("Failed to open the output workspace")?;

    // The two passes are independent: a failure in the points pass is logged
    // and the polygon pass still runs.
    println!();
    println!("Point features:");
    run_pass(
        &sink,
        &points_collection,
        GeometryKind::Point,
        "point",
        |writer| run_point_pass(&doc.placemarks, writer),
    );

    println!();
    run_pass(
        &sink,
        &polygons_collection,
        GeometryKind::Polygon,
        "polygon",
        |writer| run_polygon_pass(&doc.overlays, writer),
    );

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

/// One write session against the sink: delete and recreate the collection,
/// drain the pass into it, and finalize the file.
///
/// Failures are printed, never propagated, so the other pass always gets its
/// turn. A failed pass still finalizes the collection, keeping the records
/// that were inserted before the failure.
fn run_pass<F>(sink: &GeoJsonSink, collection: &str, kind: GeometryKind, label: &str, pass: F)
where
    F: FnOnce(&mut CollectionWriter) -> Result<usize, ConvertError>,
{
    let mut writer = match sink.create_collection(collection, kind) {
        Ok(writer) => writer,
        Err(e) => {
            println!("Could not create collection {}: {}", collection, e);
            return;
        }
    };

    match pass(&mut writer) {
        Ok(inserted) => println!("Wrote {} {} feature(s)", inserted, label),
        Err(e) => println!(
            "The {} pass stopped after {} feature(s): {}",
            label,
            writer.feature_count(),
            e
        ),
    }

    match writer.finish() {
        Ok(path) => println!("Collection written to {}", path.display()),
        Err(e) => println!("Could not finalize collection {}: {}", collection, e),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
