// src/config/settings.rs
//
// Fingerprinting parameters and their validation.

use serde::{Deserialize, Serialize};

use crate::error::{FingerprintError, Result};

/// Sample rate assumed when the decoder does not report one
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
/// FFT window length; governs frequency resolution
pub const DEFAULT_WINDOW_SIZE: usize = 4096;
/// Fraction of each window shared with the next one
pub const DEFAULT_OVERLAP_RATIO: f64 = 0.5;
/// Number of later peaks each anchor peak may be paired with (exclusive bound)
pub const DEFAULT_FAN_VALUE: usize = 15;
/// Minimum log-power a cell needs to count as a peak
pub const DEFAULT_AMPLITUDE_FLOOR: f64 = 10.0;
/// Radius of the diamond neighbourhood used for peak picking
pub const DEFAULT_NEIGHBORHOOD_SIZE: usize = 20;
pub const DEFAULT_MIN_DELTA: i64 = 0;
pub const DEFAULT_MAX_DELTA: i64 = 200;
/// Number of hex characters kept from each SHA-1 digest
pub const DEFAULT_HASH_REDUCTION_LENGTH: usize = 20;

/// Length of a full SHA-1 digest in hex characters
pub const SHA1_HEX_LENGTH: usize = 40;

/// Complete set of fingerprinting tunables.
///
/// Keys serialize in camelCase so config files read the same as the
/// documented option names (`windowSize`, `fanValue`, ...). Every key is
/// optional in a file; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FingerprintConfig {
    /// Free-form deployment label carried over from config files
    pub env: String,
    /// Used for streams that do not report their own rate
    pub sample_rate: u32,
    pub window_size: usize,
    pub overlap_ratio: f64,
    pub fan_value: usize,
    pub amplitude_floor: f64,
    pub neighborhood_size: usize,
    pub min_delta: i64,
    pub max_delta: i64,
    pub sort_by_time: bool,
    pub hash_reduction_length: usize,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            env: "unknown".to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            window_size: DEFAULT_WINDOW_SIZE,
            overlap_ratio: DEFAULT_OVERLAP_RATIO,
            fan_value: DEFAULT_FAN_VALUE,
            amplitude_floor: DEFAULT_AMPLITUDE_FLOOR,
            neighborhood_size: DEFAULT_NEIGHBORHOOD_SIZE,
            min_delta: DEFAULT_MIN_DELTA,
            max_delta: DEFAULT_MAX_DELTA,
            sort_by_time: true,
            hash_reduction_length: DEFAULT_HASH_REDUCTION_LENGTH,
        }
    }
}

impl FingerprintConfig {
    /// Samples shared between consecutive windows
    pub fn overlap(&self) -> usize {
        (self.window_size as f64 * self.overlap_ratio).floor() as usize
    }

    /// Samples advanced between consecutive windows (always >= 1 for a valid config)
    pub fn hop_size(&self) -> usize {
        self.window_size - self.overlap()
    }

    /// Reject parameter combinations the pipeline cannot run with.
    ///
    /// These are programmer errors; degenerate *inputs* (short or silent
    /// signals) are never rejected here.
    pub fn validate(&self) -> Result<()> {
        validate_sample_rate(self.sample_rate)?;
        if self.window_size == 0 {
            return Err(FingerprintError::invalid("windowSize", "must be positive, got 0"));
        }
        if !(0.0..1.0).contains(&self.overlap_ratio) {
            return Err(FingerprintError::invalid(
                "overlapRatio",
                format!("must lie in [0, 1), got {}", self.overlap_ratio),
            ));
        }
        if self.fan_value == 0 {
            return Err(FingerprintError::invalid("fanValue", "must be positive, got 0"));
        }
        if self.amplitude_floor.is_nan() {
            return Err(FingerprintError::invalid("amplitudeFloor", "must be a number"));
        }
        if self.hash_reduction_length == 0 || self.hash_reduction_length > SHA1_HEX_LENGTH {
            return Err(FingerprintError::invalid(
                "hashReductionLength",
                format!(
                    "must lie in 1..={}, got {}",
                    SHA1_HEX_LENGTH, self.hash_reduction_length
                ),
            ));
        }
        Ok(())
    }
}

/// Sample rates come from the decoder as well as from config, so the check
/// is shared.
pub fn validate_sample_rate(sample_rate: u32) -> Result<()> {
    if sample_rate == 0 {
        return Err(FingerprintError::invalid("sampleRate", "must be positive, got 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FingerprintConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.overlap(), 2048);
        assert_eq!(config.hop_size(), 2048);
    }

    #[test]
    fn test_overlap_is_floored() {
        let config = FingerprintConfig {
            window_size: 10,
            overlap_ratio: 0.75,
            ..Default::default()
        };
        assert_eq!(config.overlap(), 7);
        assert_eq!(config.hop_size(), 3);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let cases = vec![
            FingerprintConfig { window_size: 0, ..Default::default() },
            FingerprintConfig { fan_value: 0, ..Default::default() },
            FingerprintConfig { sample_rate: 0, ..Default::default() },
            FingerprintConfig { overlap_ratio: 1.0, ..Default::default() },
            FingerprintConfig { overlap_ratio: -0.1, ..Default::default() },
            FingerprintConfig { overlap_ratio: f64::NAN, ..Default::default() },
            FingerprintConfig { hash_reduction_length: 0, ..Default::default() },
            FingerprintConfig { hash_reduction_length: 41, ..Default::default() },
        ];

        for config in cases {
            match config.validate() {
                Err(FingerprintError::InvalidParameter { .. }) => {}
                other => panic!("expected InvalidParameter for {:?}, got {:?}", config, other),
            }
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(FingerprintConfig::default()).unwrap();
        assert_eq!(json["windowSize"], 4096);
        assert_eq!(json["amplitudeFloor"], 10.0);
        assert_eq!(json["sortByTime"], true);
        assert_eq!(json["hashReductionLength"], 20);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: FingerprintConfig =
            serde_json::from_str(r#"{"fanValue": 5, "env": "dev"}"#).unwrap();
        assert_eq!(config.fan_value, 5);
        assert_eq!(config.env, "dev");
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
    }
}
