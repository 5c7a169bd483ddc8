//! Audio input: decoding files into per-channel samples

mod decoder;
mod file_hash;

pub use decoder::{decode_file, decode_file_with_rate, decode_wav, deinterleave, DecodedAudio};
pub use file_hash::file_hash;
