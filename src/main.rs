//! Evoplot - diagnostic chart renderer for experiment-result CSVs.
//!
//! Reads execution traces produced by evolutionary-search runs (or
//! cluster-membership tables) and renders them to an image file.
//!
//! Exit codes:
//!   0 - Success (the destination image was written)
//!   1 - Runtime error (missing file, malformed table, bad statistic, etc.)

mod analysis;
mod chart;
mod cli;
mod config;
mod error;
mod table;

use anyhow::{Context, Result};
use cli::{Args, ClusteringArgs, Command, FitnessArgs};
use config::Config;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use analysis::{compose, default_label, resolve_names, ComposeRequest, Statistic};
use chart::{render_scatter, render_series, AxisBounds, ChartOptions, PointSet};
use table::{InfinityHandling, LoadOptions, TableSchema};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Initialize logging
    init_logging(&args);

    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Rendering failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Dispatch the selected subcommand.
fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    match &args.command {
        Command::Fitness(fitness) => run_fitness(fitness, &config),
        Command::Clustering(clustering) => run_clustering(clustering, &config),
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .evoplot.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Render a fitness-over-generation chart from one or more execution traces.
fn run_fitness(args: &FitnessArgs, config: &Config) -> Result<()> {
    // Everything that can be validated without touching the filesystem
    // runs first, so a bad invocation leaves no side effect behind.
    let statistics = requested_statistics(args)?;
    let names = resolve_names(&args.execution_traces, &args.names)?;

    // Label and title were already resolved CLI-over-config in
    // `Config::merge_with_args`.
    let fitness_label = &config.chart.fitness_label;
    let schema = TableSchema::new(["generation", fitness_label.as_str()]);
    let options = LoadOptions {
        infinity: if args.ignore_infinite {
            InfinityHandling::TreatAsMissing
        } else {
            InfinityHandling::Keep
        },
    };

    let mut inputs = Vec::with_capacity(args.execution_traces.len());
    for (path, name) in args.execution_traces.iter().zip(names) {
        info!("Loading execution trace: {}", path.display());
        let table = table::load(path, &schema, &options)?;
        inputs.push((name, table));
    }

    let request = ComposeRequest {
        metric_column: fitness_label.clone(),
        group_column: "generation".to_string(),
        statistics,
        start_index: args.start_index,
    };

    let collection = compose(&inputs, &request, default_label)?;

    let chart_options = ChartOptions {
        title: Some(config.chart.title.clone()),
        log_y: args.logy,
        ..base_chart_options(config)
    };

    ensure_parent_dir(&args.destination)?;
    render_series(&collection, &chart_options, &args.destination)?;

    info!(
        "Wrote {} series to {}",
        collection.len(),
        args.destination.display()
    );
    Ok(())
}

/// Render a cluster-membership scatter chart, optionally with centroids.
fn run_clustering(args: &ClusteringArgs, config: &Config) -> Result<()> {
    let membership_schema = TableSchema::new(["x", "y", "cluster"]);
    let load_options = LoadOptions::default();

    info!("Loading membership table: {}", args.membership.display());
    let membership = table::load(&args.membership, &membership_schema, &load_options)?;
    let points = PointSet::from_table(
        &membership,
        membership.column_id("x").expect("schema column"),
        membership.column_id("y").expect("schema column"),
        membership.column_id("cluster"),
    );

    let overlay = match &args.centroids {
        Some(path) => {
            info!("Loading centroid table: {}", path.display());
            let centroid_schema = TableSchema::new(["x", "y"]);
            let centroids = table::load(path, &centroid_schema, &load_options)?;
            Some(PointSet::from_table(
                &centroids,
                centroids.column_id("x").expect("schema column"),
                centroids.column_id("y").expect("schema column"),
                None,
            ))
        }
        None => None,
    };

    let chart_options = ChartOptions {
        title: args.title.clone(),
        x_bounds: AxisBounds {
            min: args.x_min,
            max: args.x_max,
        },
        y_bounds: AxisBounds {
            min: args.y_min,
            max: args.y_max,
        },
        ..base_chart_options(config)
    };

    ensure_parent_dir(&args.destination)?;
    render_scatter(&points, overlay.as_ref(), &chart_options, &args.destination)?;

    info!(
        "Wrote {} points to {}",
        points.points().len(),
        args.destination.display()
    );
    Ok(())
}

/// Build the statistic list in its fixed label order: max, min, then
/// quantiles in the order given. Fails on any out-of-range quantile.
fn requested_statistics(args: &FitnessArgs) -> Result<Vec<Statistic>> {
    let mut statistics = Vec::new();
    if args.max {
        statistics.push(Statistic::Max);
    }
    if args.min {
        statistics.push(Statistic::Min);
    }
    for &p in &args.quantiles {
        statistics.push(Statistic::Quantile(p));
    }
    for statistic in &statistics {
        statistic.validate()?;
    }
    Ok(statistics)
}

/// Chart options seeded from the configuration file.
fn base_chart_options(config: &Config) -> ChartOptions {
    ChartOptions {
        size: (config.chart.width, config.chart.height),
        point_size: config.chart.point_size,
        centroid_size: config.chart.centroid_size,
        ..ChartOptions::default()
    }
}

/// Create the destination's parent directories if they are missing.
fn ensure_parent_dir(destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}
