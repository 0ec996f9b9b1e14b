//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.evoplot.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Args, Command};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chart rendering settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Marker radius for membership points.
    #[serde(default = "default_point_size")]
    pub point_size: u32,

    /// Marker radius for centroid points.
    #[serde(default = "default_centroid_size")]
    pub centroid_size: u32,

    /// Column holding the fitness metric.
    #[serde(default = "default_fitness_label")]
    pub fitness_label: String,

    /// Title for fitness charts.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            point_size: default_point_size(),
            centroid_size: default_centroid_size(),
            fitness_label: default_fitness_label(),
            title: default_title(),
        }
    }
}

fn default_width() -> u32 {
    2000
}

fn default_height() -> u32 {
    1000
}

fn default_point_size() -> u32 {
    3
}

fn default_centroid_size() -> u32 {
    6
}

fn default_fitness_label() -> String {
    "fitness".to_string()
}

fn default_title() -> String {
    "Fitness".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".evoplot.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI flags take precedence over config file settings; an omitted
    /// flag leaves the config (or built-in) value in place.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Command::Fitness(fitness) = &args.command {
            if let Some(ref label) = fitness.fitness_label {
                self.chart.fitness_label = label.clone();
            }
            if let Some(ref title) = fitness.title {
                self.chart.title = title.clone();
            }
        }
    }

    /// Generate a default configuration file content.
    #[allow(dead_code)] // Utility for generating example config
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
