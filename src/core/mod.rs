//! Core fingerprinting pipeline: spectrogram, peaks, landmark hashes

pub mod dsp;
pub mod fingerprinter;
pub mod hashing;
pub mod peaks;
pub mod spectrogram;

pub use fingerprinter::{ChannelAnalysis, ChannelFingerprint, Fingerprinter, FingerprinterBuilder};
pub use hashing::{landmark_hash, Fingerprint, LandmarkHasher, Landmarks};
pub use peaks::{extract_peaks, Peak, PeakExtractor, StructuringElement};
pub use spectrogram::{build_spectrogram, power_to_db, SpectrogramBuilder, SpectrogramMatrix};
