//! Configuration module for AudioPrintr

mod loader;
mod settings;

pub use loader::{ConfigLoader, CONFIG_DEFAULT_FILE, CONFIG_DEVELOPMENT_FILE};
pub use settings::{
    validate_sample_rate, FingerprintConfig, DEFAULT_AMPLITUDE_FLOOR, DEFAULT_FAN_VALUE,
    DEFAULT_HASH_REDUCTION_LENGTH, DEFAULT_MAX_DELTA, DEFAULT_MIN_DELTA,
    DEFAULT_NEIGHBORHOOD_SIZE, DEFAULT_OVERLAP_RATIO, DEFAULT_SAMPLE_RATE, DEFAULT_WINDOW_SIZE,
    SHA1_HEX_LENGTH,
};
