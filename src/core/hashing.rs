// src/core/hashing.rs
//
// Combinatorial landmark hashing: each peak is paired with a bounded number
// of later peaks, and every pair becomes a short SHA-1 code anchored at the
// earlier peak's time.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::borrow::Cow;
use std::iter::FusedIterator;

use super::peaks::Peak;
use crate::config::{FingerprintConfig, SHA1_HEX_LENGTH};
use crate::error::{FingerprintError, Result};

/// One landmark pair: a truncated hex hash and the anchor's window index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub hash: String,
    pub offset: usize,
}

/// Hash of the key `"{freq1}|{freq2}|{delta}"`, as lowercase hex truncated
/// to `length` characters.
pub fn landmark_hash(freq1: usize, freq2: usize, delta: i64, length: usize) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("{}|{}|{}", freq1, freq2, delta).as_bytes());
    let mut code = hex::encode(hasher.finalize());
    code.truncate(length);
    code
}

/// Pairing policy for turning peaks into fingerprints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkHasher {
    fan_value: usize,
    min_delta: i64,
    max_delta: i64,
    sort_by_time: bool,
    hash_length: usize,
}

impl LandmarkHasher {
    pub fn new(
        fan_value: usize,
        min_delta: i64,
        max_delta: i64,
        sort_by_time: bool,
        hash_length: usize,
    ) -> Result<Self> {
        if fan_value == 0 {
            return Err(FingerprintError::invalid("fanValue", "must be positive, got 0"));
        }
        if hash_length == 0 || hash_length > SHA1_HEX_LENGTH {
            return Err(FingerprintError::invalid(
                "hashReductionLength",
                format!("must lie in 1..={}, got {}", SHA1_HEX_LENGTH, hash_length),
            ));
        }
        Ok(Self {
            fan_value,
            min_delta,
            max_delta,
            sort_by_time,
            hash_length,
        })
    }

    pub fn from_config(config: &FingerprintConfig) -> Result<Self> {
        Self::new(
            config.fan_value,
            config.min_delta,
            config.max_delta,
            config.sort_by_time,
            config.hash_reduction_length,
        )
    }

    /// Peaks in pairing order: stable-sorted by time if enabled, else as given
    fn ordered<'a>(&self, peaks: &'a [Peak]) -> Cow<'a, [Peak]> {
        if self.sort_by_time {
            let mut sorted = peaks.to_vec();
            sorted.sort_by_key(|p| p.time);
            Cow::Owned(sorted)
        } else {
            Cow::Borrowed(peaks)
        }
    }

    /// Fingerprint for the pair, if its time delta is inside the window
    fn pair(&self, anchor: &Peak, other: &Peak) -> Option<Fingerprint> {
        let delta = other.time as i64 - anchor.time as i64;
        if delta < self.min_delta || delta > self.max_delta {
            return None;
        }
        Some(Fingerprint {
            hash: landmark_hash(anchor.frequency, other.frequency, delta, self.hash_length),
            offset: anchor.time,
        })
    }

    /// Lazily pair the peaks. The result can be recomputed from the same
    /// peaks at any time.
    pub fn hash<'a>(&self, peaks: &'a [Peak]) -> Landmarks<'a> {
        Landmarks {
            hasher: *self,
            peaks: self.ordered(peaks),
            anchor: 0,
            step: 1,
        }
    }

    /// Same sequence as [`hash`](Self::hash), computed in parallel over anchors
    pub fn hash_all(&self, peaks: &[Peak]) -> Vec<Fingerprint> {
        let peaks = self.ordered(peaks);
        let peaks: &[Peak] = &peaks;
        (0..peaks.len())
            .into_par_iter()
            .flat_map_iter(|i| {
                let end = i.saturating_add(self.fan_value).min(peaks.len());
                (i + 1..end).filter_map(move |k| self.pair(&peaks[i], &peaks[k]))
            })
            .collect()
    }
}

/// Lazy, finite sequence of fingerprints produced by [`LandmarkHasher::hash`]
pub struct Landmarks<'a> {
    hasher: LandmarkHasher,
    peaks: Cow<'a, [Peak]>,
    anchor: usize,
    step: usize,
}

impl Iterator for Landmarks<'_> {
    type Item = Fingerprint;

    fn next(&mut self) -> Option<Fingerprint> {
        let n = self.peaks.len();
        while self.anchor < n {
            while self.step < self.hasher.fan_value && self.step < n - self.anchor {
                let other = self.anchor + self.step;
                self.step += 1;
                if let Some(fp) = self.hasher.pair(&self.peaks[self.anchor], &self.peaks[other]) {
                    return Some(fp);
                }
            }
            self.anchor += 1;
            self.step = 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.peaks.len().saturating_sub(self.anchor);
        (0, Some(remaining.saturating_mul(self.hasher.fan_value - 1)))
    }
}

impl FusedIterator for Landmarks<'_> {}
