//! AudioPrintr - Landmark fingerprints for audio
//!
//! Computes a compact, time-localized fingerprint of an audio signal: a set
//! of short hash codes, each anchored to a time offset, such that the same
//! recording (or a noisy / re-encoded copy of it) yields overlapping sets.
//!
//! ## Pipeline
//!
//! 1. **Spectrogram** - overlapping Hann windows, one-sided power spectral
//!    density in dB (`core::spectrogram`)
//! 2. **Peaks** - cells that dominate a diamond-shaped neighbourhood and
//!    rise above an amplitude floor (`core::peaks`)
//! 3. **Landmarks** - each peak paired with a few later peaks; every pair
//!    becomes `sha1("f1|f2|dt")` truncated, tagged with the earlier peak's
//!    window index (`core::hashing`)
//!
//! Each channel is fingerprinted on its own. Matching fingerprints against
//! a database is out of scope.
//!
//! ## Module Structure
//!
//! - `core` - The fingerprinting pipeline and its DSP helpers
//! - `audio` - Decoding files into per-channel samples
//! - `config` - Tunables and layered JSON config loading
//! - `visualization` - Spectrogram images with peaks marked
//! - `cli` - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use audioprintr::{decode_file, Fingerprinter};
//!
//! let audio = decode_file(path, None)?;
//! let fingerprinter = Fingerprinter::builder().fan_value(15).build()?;
//!
//! for samples in &audio.channels {
//!     for fp in fingerprinter.fingerprint(samples, audio.sample_rate)? {
//!         println!("{} @ {}", fp.hash, fp.offset);
//!     }
//! }
//! ```
//!
//! ## Tunables
//!
//! | Option                | Default | Effect                                        |
//! |-----------------------|---------|-----------------------------------------------|
//! | `windowSize`          | 4096    | FFT length; frequency resolution              |
//! | `overlapRatio`        | 0.5     | Window overlap; time resolution               |
//! | `fanValue`            | 15      | Pairs per anchor peak (exclusive bound)       |
//! | `amplitudeFloor`      | 10      | Minimum dB for a peak                         |
//! | `neighborhoodSize`    | 20      | Peak exclusion radius; larger is sparser      |
//! | `minDelta`/`maxDelta` | 0/200   | Allowed window distance between paired peaks  |
//! | `sortByTime`          | true    | Sort peaks by time before pairing             |
//! | `hashReductionLength` | 20      | Hex characters kept from each SHA-1           |

// Fingerprinting pipeline
pub mod core;

// Audio file decoding
pub mod audio;

// Command-line interface
pub mod cli;

// Tunables and config files
pub mod config;

// Error types
pub mod error;

// Peak map images
pub mod visualization;

// Re-export commonly used types at crate root for convenience
pub use audio::{decode_file, decode_file_with_rate, DecodedAudio};
pub use config::{ConfigLoader, FingerprintConfig};
pub use crate::core::{
    build_spectrogram, extract_peaks, landmark_hash, ChannelAnalysis, ChannelFingerprint,
    Fingerprint, Fingerprinter, FingerprinterBuilder, LandmarkHasher, Peak, PeakExtractor,
    SpectrogramBuilder, SpectrogramMatrix, StructuringElement,
};
pub use error::{FingerprintError, Result};
