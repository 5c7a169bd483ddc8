// src/core/spectrogram.rs
//
// Short-time power spectrum of one channel, in decibels.

use log::debug;
use num_complex::Complex;
use rayon::prelude::*;

use super::dsp::{create_window, window_power, RealFftTransform, SpectrumTransform, WindowType};
use crate::config::{validate_sample_rate, FingerprintConfig};
use crate::error::{FingerprintError, Result};

/// Log-power map indexed `[frequency bin][time window]`.
///
/// Stored frequency-major: row `f` holds every window of bin `f`. Cells
/// whose power was exactly zero hold `0.0`, never `-inf`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramMatrix {
    bins: usize,
    windows: usize,
    data: Vec<f64>,
}

impl SpectrogramMatrix {
    /// Matrix with `bins` rows and no time windows
    pub fn empty(bins: usize) -> Self {
        Self {
            bins,
            windows: 0,
            data: Vec::new(),
        }
    }

    /// Build from frequency rows of equal length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let bins = rows.len();
        let windows = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != windows) {
            return Err(FingerprintError::invalid(
                "matrix",
                "all frequency rows must have the same number of windows",
            ));
        }
        Ok(Self {
            bins,
            windows,
            data: rows.into_iter().flatten().collect(),
        })
    }

    fn from_columns(bins: usize, columns: Vec<Vec<f64>>) -> Self {
        let windows = columns.len();
        let mut data = vec![0.0; bins * windows];
        for (t, column) in columns.iter().enumerate() {
            for (f, &value) in column.iter().enumerate() {
                data[f * windows + t] = value;
            }
        }
        Self { bins, windows, data }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn windows(&self) -> usize {
        self.windows
    }

    /// True when there are no cells (no windows or no bins)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, freq: usize, time: usize) -> f64 {
        self.data[freq * self.windows + time]
    }

    /// All windows of one frequency bin
    pub fn row(&self, freq: usize) -> &[f64] {
        &self.data[freq * self.windows..(freq + 1) * self.windows]
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// `(min, max)` over every cell, `None` when empty
    pub fn value_range(&self) -> Option<(f64, f64)> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.data.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        ))
    }
}

/// Splits a signal into overlapping Hann-windowed frames and turns each
/// frame into one column of one-sided power spectral density.
pub struct SpectrogramBuilder {
    window_size: usize,
    hop_size: usize,
    sample_rate: f64,
    window: Vec<f64>,
    window_power: f64,
    transform: Box<dyn SpectrumTransform>,
}

impl SpectrogramBuilder {
    pub fn new(window_size: usize, overlap_ratio: f64, sample_rate: u32) -> Result<Self> {
        let config = FingerprintConfig {
            window_size,
            overlap_ratio,
            sample_rate,
            ..Default::default()
        };
        Self::from_config(&config, sample_rate)
    }

    /// Use the config's window parameters with the channel's actual sample rate
    pub fn from_config(config: &FingerprintConfig, sample_rate: u32) -> Result<Self> {
        config.validate()?;
        validate_sample_rate(sample_rate)?;

        let window = create_window(config.window_size, WindowType::Hann);
        Ok(Self {
            window_size: config.window_size,
            hop_size: config.hop_size(),
            sample_rate: sample_rate as f64,
            window_power: window_power(&window),
            window,
            transform: Box::new(RealFftTransform::new(config.window_size)),
        })
    }

    pub fn with_window(mut self, window_type: WindowType) -> Self {
        self.window = create_window(self.window_size, window_type);
        self.window_power = window_power(&self.window);
        self
    }

    /// Swap the FFT backend; it must be planned for the same window size
    pub fn with_transform(mut self, transform: Box<dyn SpectrumTransform>) -> Result<Self> {
        if transform.fft_size() != self.window_size {
            return Err(FingerprintError::invalid(
                "transform",
                format!(
                    "planned for {} samples, window size is {}",
                    transform.fft_size(),
                    self.window_size
                ),
            ));
        }
        self.transform = transform;
        Ok(self)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Number of frequency rows produced (`window_size / 2 + 1`)
    pub fn bins(&self) -> usize {
        self.window_size / 2 + 1
    }

    /// Number of complete windows that fit in `sample_count` samples
    pub fn num_windows(&self, sample_count: usize) -> usize {
        if sample_count < self.window_size {
            return 0;
        }
        (sample_count - self.window_size) / self.hop_size + 1
    }

    /// Compute the log-power spectrogram of one channel.
    ///
    /// A signal shorter than one window gives a matrix with zero windows.
    pub fn build<S>(&self, samples: &[S]) -> Result<SpectrogramMatrix>
    where
        S: Copy + Into<f64> + Sync,
    {
        let bins = self.bins();
        let num_windows = self.num_windows(samples.len());
        if num_windows == 0 {
            debug!(
                "{} samples is shorter than one {}-sample window; empty spectrogram",
                samples.len(),
                self.window_size
            );
            return Ok(SpectrogramMatrix::empty(bins));
        }

        let columns = (0..num_windows)
            .into_par_iter()
            .map(|w| {
                let start = w * self.hop_size;
                self.column(&samples[start..start + self.window_size])
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Spectrogram: {} bins x {} windows", bins, num_windows);
        Ok(SpectrogramMatrix::from_columns(bins, columns))
    }

    fn column<S: Copy + Into<f64>>(&self, frame: &[S]) -> Result<Vec<f64>> {
        let mut buffer: Vec<f64> = frame
            .iter()
            .zip(self.window.iter())
            .map(|(&s, &w)| s.into() * w)
            .collect();
        let mut spectrum = vec![Complex::new(0.0, 0.0); self.bins()];
        self.transform.transform(&mut buffer, &mut spectrum)?;

        // One-sided density: every bin except DC (and Nyquist for even
        // sizes) also carries the energy of its negative-frequency twin.
        let doubled_end = if self.window_size % 2 == 0 {
            spectrum.len() - 1
        } else {
            spectrum.len()
        };

        Ok(spectrum
            .iter()
            .enumerate()
            .map(|(k, c)| {
                let mut power = c.norm_sqr();
                if k > 0 && k < doubled_end {
                    power *= 2.0;
                }
                power / self.sample_rate / self.window_power
            })
            .map(power_to_db)
            .collect())
    }
}

/// `10 log10(power)`, with zero power mapped to `0.0` instead of `-inf`
pub fn power_to_db(power: f64) -> f64 {
    let db = 10.0 * power.log10();
    if db == f64::NEG_INFINITY {
        0.0
    } else {
        db
    }
}

/// One-shot spectrogram with the default FFT backend
pub fn build_spectrogram<S>(
    samples: &[S],
    sample_rate: u32,
    window_size: usize,
    overlap_ratio: f64,
) -> Result<SpectrogramMatrix>
where
    S: Copy + Into<f64> + Sync,
{
    SpectrogramBuilder::new(window_size, overlap_ratio, sample_rate)?.build(samples)
}
