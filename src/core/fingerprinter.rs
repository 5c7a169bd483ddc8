// src/core/fingerprinter.rs
//
// High-level fingerprinting API with builder pattern.
// Runs spectrogram -> peaks -> landmark hashes for one channel at a time.

use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use super::hashing::{Fingerprint, LandmarkHasher};
use super::peaks::{Peak, PeakExtractor};
use super::spectrogram::{SpectrogramBuilder, SpectrogramMatrix};
use crate::config::FingerprintConfig;
use crate::error::Result;

/// Every intermediate of one channel's pipeline run
#[derive(Debug, Clone)]
pub struct ChannelAnalysis {
    pub spectrogram: SpectrogramMatrix,
    pub peaks: Vec<Peak>,
    pub fingerprints: Vec<Fingerprint>,
}

impl ChannelAnalysis {
    /// Drop the intermediates, keeping counts and fingerprints
    pub fn into_channel(self, channel: usize) -> ChannelFingerprint {
        ChannelFingerprint {
            channel,
            peak_count: self.peaks.len(),
            fingerprints: self.fingerprints,
        }
    }
}

/// Fingerprints of one channel of a multi-channel signal
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelFingerprint {
    pub channel: usize,
    pub peak_count: usize,
    pub fingerprints: Vec<Fingerprint>,
}

/// Builder for Fingerprinter configuration
#[derive(Debug, Clone, Default)]
pub struct FingerprinterBuilder {
    config: FingerprintConfig,
}

impl FingerprinterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: FingerprintConfig) -> Self {
        Self { config }
    }

    pub fn window_size(mut self, size: usize) -> Self {
        self.config.window_size = size;
        self
    }

    pub fn overlap_ratio(mut self, ratio: f64) -> Self {
        self.config.overlap_ratio = ratio;
        self
    }

    pub fn fan_value(mut self, fan_value: usize) -> Self {
        self.config.fan_value = fan_value;
        self
    }

    pub fn amplitude_floor(mut self, floor: f64) -> Self {
        self.config.amplitude_floor = floor;
        self
    }

    pub fn neighborhood_size(mut self, size: usize) -> Self {
        self.config.neighborhood_size = size;
        self
    }

    pub fn delta_range(mut self, min_delta: i64, max_delta: i64) -> Self {
        self.config.min_delta = min_delta;
        self.config.max_delta = max_delta;
        self
    }

    pub fn sort_by_time(mut self, sort: bool) -> Self {
        self.config.sort_by_time = sort;
        self
    }

    pub fn hash_reduction_length(mut self, length: usize) -> Self {
        self.config.hash_reduction_length = length;
        self
    }

    pub fn build(self) -> Result<Fingerprinter> {
        Fingerprinter::new(self.config)
    }
}

/// Stateless landmark fingerprinter. One instance can serve any number of
/// channels, concurrently.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    config: FingerprintConfig,
    extractor: PeakExtractor,
    hasher: LandmarkHasher,
}

impl Fingerprinter {
    /// Validate the config and prepare the peak and hash stages
    pub fn new(config: FingerprintConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extractor: PeakExtractor::from_config(&config)?,
            hasher: LandmarkHasher::from_config(&config)?,
            config,
        })
    }

    pub fn builder() -> FingerprinterBuilder {
        FingerprinterBuilder::new()
    }

    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Log-power spectrogram of one channel
    pub fn spectrogram<S>(&self, samples: &[S], sample_rate: u32) -> Result<SpectrogramMatrix>
    where
        S: Copy + Into<f64> + Sync,
    {
        SpectrogramBuilder::from_config(&self.config, sample_rate)?.build(samples)
    }

    pub fn peaks(&self, spectrogram: &SpectrogramMatrix) -> Vec<Peak> {
        self.extractor.extract(spectrogram)
    }

    pub fn hasher(&self) -> &LandmarkHasher {
        &self.hasher
    }

    /// Run the whole pipeline and keep the intermediates
    pub fn analyze<S>(&self, samples: &[S], sample_rate: u32) -> Result<ChannelAnalysis>
    where
        S: Copy + Into<f64> + Sync,
    {
        let spectrogram = self.spectrogram(samples, sample_rate)?;
        let peaks = self.peaks(&spectrogram);
        debug!("local_maxima: {} frequency & time pairs", peaks.len());

        let fingerprints = self.hasher.hash_all(&peaks);
        debug!("{} fingerprints from {} samples", fingerprints.len(), samples.len());

        Ok(ChannelAnalysis {
            spectrogram,
            peaks,
            fingerprints,
        })
    }

    /// Fingerprints of one channel
    pub fn fingerprint<S>(&self, samples: &[S], sample_rate: u32) -> Result<Vec<Fingerprint>>
    where
        S: Copy + Into<f64> + Sync,
    {
        Ok(self.analyze(samples, sample_rate)?.fingerprints)
    }

    /// Fingerprint each channel independently, in parallel. Results come
    /// back in channel order.
    pub fn fingerprint_channels<S>(
        &self,
        channels: &[Vec<S>],
        sample_rate: u32,
    ) -> Result<Vec<ChannelFingerprint>>
    where
        S: Copy + Into<f64> + Sync + Send,
    {
        channels
            .par_iter()
            .enumerate()
            .map(|(channel, samples)| -> Result<ChannelFingerprint> {
                Ok(self.analyze(samples, sample_rate)?.into_channel(channel))
            })
            .collect()
    }
}
