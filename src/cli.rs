//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Evoplot - diagnostic chart renderer for experiment-result CSVs
///
/// Renders fitness-over-generation charts from evolutionary-search
/// execution traces and membership/centroid scatter charts from
/// clustering results.
///
/// Examples:
///   evoplot fitness -e trace.csv -d fitness.png --max --min --quantile 0.5
///   evoplot fitness -e a.csv -e b.csv -n baseline -n tuned -d cmp.png --max
///   evoplot clustering -e membership.csv -c centroids.csv -d clusters.png
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .evoplot.toml in the current directory
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per chart kind.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render a fitness-over-generation line chart from execution traces
    Fitness(FitnessArgs),
    /// Render a cluster-membership scatter chart
    Clustering(ClusteringArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct FitnessArgs {
    /// Execution trace CSV (repeat to overlay multiple traces)
    #[arg(
        short = 'e',
        long = "execution-trace",
        value_name = "CSV",
        required = true
    )]
    pub execution_traces: Vec<PathBuf>,

    /// Display name per trace (defaults to the file stem)
    ///
    /// When given, the name count must match the trace count.
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub names: Vec<String>,

    /// Destination image file (format chosen by extension)
    #[arg(short, long, value_name = "FILE")]
    pub destination: PathBuf,

    /// Column holding the fitness metric (default `fitness`, can also
    /// be set in the config file)
    #[arg(long, value_name = "COLUMN")]
    pub fitness_label: Option<String>,

    /// Chart title (default `Fitness`, can also be set in the config
    /// file)
    #[arg(long)]
    pub title: Option<String>,

    /// Plot the per-generation maximum
    #[arg(long)]
    pub max: bool,

    /// Plot the per-generation minimum
    #[arg(long)]
    pub min: bool,

    /// Quantile to plot, in [0, 1] (repeatable)
    #[arg(long = "quantile", value_name = "P")]
    pub quantiles: Vec<f64>,

    /// Use a logarithmic y axis
    #[arg(long)]
    pub logy: bool,

    /// Drop the first N generations of every series from display
    #[arg(long, default_value = "0", value_name = "N")]
    pub start_index: usize,

    /// Treat infinite fitness values as missing
    #[arg(long)]
    pub ignore_infinite: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ClusteringArgs {
    /// Membership CSV with `x`, `y` and `cluster` columns
    #[arg(short = 'e', long, value_name = "CSV")]
    pub membership: PathBuf,

    /// Centroid CSV with `x` and `y` columns (omit to skip the overlay)
    #[arg(short = 'c', long, value_name = "CSV")]
    pub centroids: Option<PathBuf>,

    /// Destination image file (format chosen by extension)
    #[arg(short, long, value_name = "FILE")]
    pub destination: PathBuf,

    /// Lower x-axis bound
    #[arg(long, value_name = "MIN", allow_negative_numbers = true)]
    pub x_min: Option<f64>,

    /// Upper x-axis bound
    #[arg(long, value_name = "MAX", allow_negative_numbers = true)]
    pub x_max: Option<f64>,

    /// Lower y-axis bound
    #[arg(long, value_name = "MIN", allow_negative_numbers = true)]
    pub y_min: Option<f64>,

    /// Upper y-axis bound
    #[arg(long, value_name = "MAX", allow_negative_numbers = true)]
    pub y_max: Option<f64>,

    /// Chart title
    #[arg(long)]
    pub title: Option<String>,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Command::Fitness(fitness) = &self.command {
            if !fitness.max && !fitness.min && fitness.quantiles.is_empty() {
                return Err(
                    "No statistic requested: pass --max, --min and/or --quantile".to_string(),
                );
            }
        }

        if let Command::Clustering(clustering) = &self.command {
            let axes = [
                ("x", clustering.x_min, clustering.x_max),
                ("y", clustering.y_min, clustering.y_max),
            ];
            for (axis, min, max) in axes {
                if let (Some(min), Some(max)) = (min, max) {
                    if min >= max {
                        return Err(format!(
                            "--{axis}-min ({min}) must be below --{axis}-max ({max})"
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(args)
    }

    #[test]
    fn test_fitness_defaults() {
        let args = parse(&[
            "evoplot", "fitness", "-e", "trace.csv", "-d", "out.png", "--max",
        ])
        .unwrap();
        let Command::Fitness(fitness) = args.command else {
            panic!("expected fitness subcommand");
        };
        // Label and title defaults resolve through the config layer.
        assert!(fitness.fitness_label.is_none());
        assert!(fitness.title.is_none());
        assert_eq!(fitness.start_index, 0);
        assert!(!fitness.logy);
        assert!(fitness.names.is_empty());
    }

    #[test]
    fn test_fitness_repeatable_flags() {
        let args = parse(&[
            "evoplot",
            "fitness",
            "-e",
            "a.csv",
            "-e",
            "b.csv",
            "-n",
            "baseline",
            "-n",
            "tuned",
            "-d",
            "out.png",
            "--quantile",
            "0.25",
            "--quantile",
            "0.75",
        ])
        .unwrap();
        let Command::Fitness(fitness) = args.command else {
            panic!("expected fitness subcommand");
        };
        assert_eq!(fitness.execution_traces.len(), 2);
        assert_eq!(fitness.names, vec!["baseline", "tuned"]);
        assert_eq!(fitness.quantiles, vec![0.25, 0.75]);
    }

    #[test]
    fn test_fitness_without_statistics_is_rejected() {
        let args = parse(&["evoplot", "fitness", "-e", "trace.csv", "-d", "out.png"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_verbosity() {
        let args = parse(&[
            "evoplot", "-v", "-q", "fitness", "-e", "t.csv", "-d", "o.png", "--max",
        ])
        .unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_clustering_optional_centroids() {
        let args = parse(&[
            "evoplot",
            "clustering",
            "-e",
            "membership.csv",
            "-d",
            "out.png",
            "--x-min",
            "-150",
            "--x-max",
            "150",
        ])
        .unwrap();
        let Command::Clustering(clustering) = args.command else {
            panic!("expected clustering subcommand");
        };
        assert!(clustering.centroids.is_none());
        assert_eq!(clustering.x_min, Some(-150.0));
        assert_eq!(clustering.x_max, Some(150.0));
        assert!(clustering.y_min.is_none());
    }

    #[test]
    fn test_inverted_axis_bounds_are_rejected() {
        let args = parse(&[
            "evoplot",
            "clustering",
            "-e",
            "membership.csv",
            "-d",
            "out.png",
            "--x-min",
            "150",
            "--x-max",
            "-150",
        ])
        .unwrap();
        let err = args.validate().unwrap_err();
        assert!(err.contains("--x-min"), "message was: {err}");

        let args = parse(&[
            "evoplot",
            "clustering",
            "-e",
            "membership.csv",
            "-d",
            "out.png",
            "--y-min",
            "0",
            "--y-max",
            "0",
        ])
        .unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let args = parse(&["evoplot", "fitness", "-e", "t.csv", "-d", "o.png", "--max"]).unwrap();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        let args = parse(&[
            "evoplot", "-v", "fitness", "-e", "t.csv", "-d", "o.png", "--max",
        ])
        .unwrap();
        assert_eq!(args.log_level(), tracing::Level::DEBUG);
    }
}
