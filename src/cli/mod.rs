// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod files;
mod output;

pub use args::{Args, OutputFormat};
pub use files::{collect_audio_files, plot_stems, AUDIO_EXTENSIONS};
pub use output::{format_failure, format_json, format_report, format_summary, FileReport};

use anyhow::{Context, Result};
use colorful::Colorful;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::audio::decode_file_with_rate;
use crate::core::Fingerprinter;
use crate::visualization::save_peak_map;

/// Run the CLI. Returns `true` when every file was fingerprinted.
pub fn run(args: &Args) -> Result<bool> {
    let config = args.load_config().context("Failed to load configuration")?;
    info!("Config env: {}", config.env);
    let fingerprinter = Fingerprinter::new(config).context("Invalid fingerprint parameters")?;

    let files = collect_audio_files(&args.inputs);
    if files.is_empty() {
        println!("{}", "No audio files found!".red());
        return Ok(true);
    }

    if let Some(dir) = &args.plot {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create plot directory {}", dir.display()))?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    if args.format == OutputFormat::Json {
        progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    } else if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        progress.set_style(style);
    }

    let stems = plot_stems(&files);
    let results: Vec<(PathBuf, Result<FileReport>)> = files
        .par_iter()
        .zip(stems.par_iter())
        .progress_with(progress.clone())
        .map(|(path, stem)| (path.clone(), process_file(path, stem, &fingerprinter, args)))
        .collect();
    progress.finish_and_clear();

    let mut reports = Vec::new();
    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(report) => {
                if args.format == OutputFormat::Text {
                    print!("{}", format_report(&report, args.verbose));
                }
                reports.push(report);
            }
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                failed += 1;
                if args.format == OutputFormat::Text {
                    print!("{}", format_failure(&path.display().to_string(), &e));
                }
            }
        }
    }

    match args.format {
        OutputFormat::Json => println!("{}", format_json(&reports)?),
        OutputFormat::Text => print!("{}", format_summary(&reports, failed)),
    }

    Ok(failed == 0)
}

fn process_file(
    path: &Path,
    plot_stem: &str,
    fingerprinter: &Fingerprinter,
    args: &Args,
) -> Result<FileReport> {
    let audio = decode_file_with_rate(path, args.limit, fingerprinter.config().sample_rate)
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    let mut channels = Vec::with_capacity(audio.channels.len());
    for (index, samples) in audio.channels.iter().enumerate() {
        let analysis = fingerprinter
            .analyze(samples, audio.sample_rate)
            .with_context(|| format!("Failed to fingerprint channel {}", index))?;

        if let Some(dir) = &args.plot {
            let image_path = dir.join(format!("{}_ch{}.png", plot_stem, index));
            match save_peak_map(&analysis.spectrogram, &analysis.peaks, &image_path) {
                Ok(()) => info!("Peak map saved to {}", image_path.display()),
                Err(e) => warn!("No peak map for {} channel {}: {}", path.display(), index, e),
            }
        }

        channels.push(analysis.into_channel(index));
    }

    let report = FileReport {
        file: path.display().to_string(),
        file_hash: audio.file_hash.clone(),
        sample_rate: audio.sample_rate,
        duration_secs: audio.duration_secs(),
        channels,
    };
    info!(
        "{}: {} fingerprints over {} channel(s)",
        report.file,
        report.total_fingerprints(),
        report.channels.len()
    );
    Ok(report)
}
