//! CLI argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{ConfigLoader, FingerprintConfig};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "audioprintr")]
#[command(version)]
#[command(about = "Compute landmark fingerprints of audio files")]
pub struct Args {
    /// Input files or directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// JSON config file applied on top of config.json / config-development.json
    #[arg(short, long, env = "AUDIOPRINTR_CONFIG")]
    pub config: Option<PathBuf>,

    /// FFT window size in samples
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Overlap between consecutive windows, in [0, 1)
    #[arg(long)]
    pub overlap_ratio: Option<f64>,

    /// Pair each peak with up to this many following peaks (exclusive)
    #[arg(long)]
    pub fan_value: Option<usize>,

    /// Minimum log-power for a peak
    #[arg(long = "amp-min", allow_hyphen_values = true)]
    pub amplitude_floor: Option<f64>,

    /// Peak neighbourhood radius in cells
    #[arg(long)]
    pub neighborhood_size: Option<usize>,

    /// Smallest time delta (in windows) between paired peaks
    #[arg(long, allow_hyphen_values = true)]
    pub min_delta: Option<i64>,

    /// Largest time delta (in windows) between paired peaks
    #[arg(long, allow_hyphen_values = true)]
    pub max_delta: Option<i64>,

    /// Pair peaks in detection order instead of sorting them by time
    #[arg(long)]
    pub no_sort: bool,

    /// Hex characters kept from each hash (1-40)
    #[arg(long = "hash-length")]
    pub hash_reduction_length: Option<usize>,

    /// Only fingerprint the first N seconds of each file
    #[arg(short, long)]
    pub limit: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write a spectrogram image with peaks for every channel into DIR
    #[arg(long, value_name = "DIR")]
    pub plot: Option<PathBuf>,

    /// Verbose output (debug logging and fingerprint listing)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Layered config files, then command-line overrides
    pub fn load_config(&self) -> Result<FingerprintConfig> {
        let mut loader = ConfigLoader::standard();
        if let Some(path) = &self.config {
            loader = loader.required(path);
        }
        let mut config = loader.load()?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut FingerprintConfig) {
        if let Some(v) = self.window_size {
            config.window_size = v;
        }
        if let Some(v) = self.overlap_ratio {
            config.overlap_ratio = v;
        }
        if let Some(v) = self.fan_value {
            config.fan_value = v;
        }
        if let Some(v) = self.amplitude_floor {
            config.amplitude_floor = v;
        }
        if let Some(v) = self.neighborhood_size {
            config.neighborhood_size = v;
        }
        if let Some(v) = self.min_delta {
            config.min_delta = v;
        }
        if let Some(v) = self.max_delta {
            config.max_delta = v;
        }
        if self.no_sort {
            config.sort_by_time = false;
        }
        if let Some(v) = self.hash_reduction_length {
            config.hash_reduction_length = v;
        }
    }
}
