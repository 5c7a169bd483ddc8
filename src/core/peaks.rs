// src/core/peaks.rs
//
// Two-dimensional local peak picking on a log-power spectrogram.
//
// A cell is a peak when it is the maximum of its diamond-shaped
// neighbourhood, is not buried in a flat region of empty (zero) cells, and
// rises above the amplitude floor.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::spectrogram::SpectrogramMatrix;
use crate::config::FingerprintConfig;
use crate::error::{FingerprintError, Result};

/// A locally dominant time-frequency cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Row of the spectrogram (frequency bin)
    pub frequency: usize,
    /// Column of the spectrogram (window index)
    pub time: usize,
    /// Log-power of the cell
    pub amplitude: f64,
}

/// Set of `(d_freq, d_time)` offsets forming a neighbourhood.
///
/// Offsets are kept nearest-first so scans that can stop early usually do
/// so after a handful of comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    radius: usize,
    offsets: Vec<(isize, isize)>,
}

impl StructuringElement {
    /// The 4-connected unit cross
    pub fn cross() -> Self {
        Self::iterated_cross(1)
    }

    /// The unit cross dilated with itself until it reaches `radius`:
    /// every offset with `|df| + |dt| <= radius`.
    pub fn iterated_cross(radius: usize) -> Self {
        const CROSS: [(isize, isize); 5] = [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)];

        let mut grown: BTreeSet<(isize, isize)> = BTreeSet::new();
        grown.insert((0, 0));
        for _ in 0..radius {
            grown = grown
                .iter()
                .flat_map(|&(f, t)| CROSS.into_iter().map(move |(df, dt)| (f + df, t + dt)))
                .collect();
        }

        let mut offsets: Vec<(isize, isize)> = grown.into_iter().collect();
        offsets.sort_by_key(|&(f, t)| (f.abs() + t.abs(), f, t));
        Self { radius, offsets }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Mirror an out-of-range index back into `0..len` (`d c b a | a b c d | d c b a`)
#[inline]
fn reflect(index: isize, len: usize) -> usize {
    let n = len as isize;
    let period = 2 * n;
    let i = index.rem_euclid(period);
    if i >= n {
        (period - 1 - i) as usize
    } else {
        i as usize
    }
}

/// Peak picker configured with a neighbourhood and an amplitude floor
#[derive(Debug, Clone)]
pub struct PeakExtractor {
    element: StructuringElement,
    amplitude_floor: f64,
}

impl PeakExtractor {
    pub fn new(neighborhood_size: usize, amplitude_floor: f64) -> Result<Self> {
        if amplitude_floor.is_nan() {
            return Err(FingerprintError::invalid("amplitudeFloor", "must be a number"));
        }
        Ok(Self {
            element: StructuringElement::iterated_cross(neighborhood_size),
            amplitude_floor,
        })
    }

    pub fn from_config(config: &FingerprintConfig) -> Result<Self> {
        Self::new(config.neighborhood_size, config.amplitude_floor)
    }

    pub fn element(&self) -> &StructuringElement {
        &self.element
    }

    pub fn amplitude_floor(&self) -> f64 {
        self.amplitude_floor
    }

    /// First pass: cells equal to the maximum of their neighbourhood.
    ///
    /// Ties count as maxima. Neighbours past the matrix edge are mirrored
    /// back inside. The mask is frequency-major, like the matrix.
    pub fn local_maxima_mask(&self, matrix: &SpectrogramMatrix) -> Vec<bool> {
        let (bins, windows) = (matrix.bins(), matrix.windows());
        let mut mask = vec![false; bins * windows];
        if mask.is_empty() {
            return mask;
        }

        mask.par_chunks_mut(windows)
            .enumerate()
            .for_each(|(f, row)| {
                for (t, cell) in row.iter_mut().enumerate() {
                    let value = matrix.get(f, t);
                    *cell = self.element.offsets().iter().all(|&(df, dt)| {
                        let nf = reflect(f as isize + df, bins);
                        let nt = reflect(t as isize + dt, windows);
                        matrix.get(nf, nt) <= value
                    });
                }
            });
        mask
    }

    /// Second pass: the zero-valued background eroded by the neighbourhood.
    ///
    /// A cell survives only if every neighbour inside the matrix is zero;
    /// positions past the edge count as background.
    pub fn eroded_background_mask(&self, matrix: &SpectrogramMatrix) -> Vec<bool> {
        let (bins, windows) = (matrix.bins(), matrix.windows());
        let mut mask = vec![false; bins * windows];
        if mask.is_empty() {
            return mask;
        }

        mask.par_chunks_mut(windows)
            .enumerate()
            .for_each(|(f, row)| {
                for (t, cell) in row.iter_mut().enumerate() {
                    if matrix.get(f, t) != 0.0 {
                        continue;
                    }
                    *cell = self.element.offsets().iter().all(|&(df, dt)| {
                        let nf = f as isize + df;
                        let nt = t as isize + dt;
                        if nf < 0 || nt < 0 || nf >= bins as isize || nt >= windows as isize {
                            return true;
                        }
                        matrix.get(nf as usize, nt as usize) == 0.0
                    });
                }
            });
        mask
    }

    /// Find all peaks, ordered by frequency bin and then by time.
    pub fn extract(&self, matrix: &SpectrogramMatrix) -> Vec<Peak> {
        if matrix.is_empty() {
            debug!("Empty spectrogram; no peaks");
            return Vec::new();
        }

        let local_max = self.local_maxima_mask(matrix);
        let eroded = self.eroded_background_mask(matrix);
        let windows = matrix.windows();

        let peaks: Vec<Peak> = local_max
            .iter()
            .zip(eroded.iter())
            .enumerate()
            .filter(|&(_, (&is_max, &is_background))| is_max ^ is_background)
            .map(|(i, _)| Peak {
                frequency: i / windows,
                time: i % windows,
                amplitude: matrix.values()[i],
            })
            .filter(|p| p.amplitude > self.amplitude_floor)
            .collect();

        debug!(
            "Local maxima: {} peaks above {} dB (neighbourhood radius {})",
            peaks.len(),
            self.amplitude_floor,
            self.element.radius()
        );
        peaks
    }
}

/// One-shot peak extraction
pub fn extract_peaks(
    matrix: &SpectrogramMatrix,
    neighborhood_size: usize,
    amplitude_floor: f64,
) -> Result<Vec<Peak>> {
    Ok(PeakExtractor::new(neighborhood_size, amplitude_floor)?.extract(matrix))
}
