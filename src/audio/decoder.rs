// src/audio/decoder.rs
//
// Audio decoding into per-channel 16-bit integer samples.
// Uses Symphonia for format-agnostic decoding, with a plain WAV reader as
// fallback for files Symphonia rejects.

use log::{debug, warn};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use std::fs::File;
use std::path::Path;

use super::file_hash::file_hash;
use crate::config::{validate_sample_rate, DEFAULT_SAMPLE_RATE};
use crate::error::{FingerprintError, Result};

/// Decoded file, ready for per-channel fingerprinting
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// One sample vector per channel
    pub channels: Vec<Vec<i16>>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// File name without extension
    pub file_name: String,
    /// Extension including the leading dot, or empty
    pub extension: String,
    /// Uppercase SHA-1 of the raw file bytes
    pub file_hash: String,
}

impl DecodedAudio {
    pub fn duration_secs(&self) -> f64 {
        let frames = self.channels.first().map_or(0, Vec::len);
        frames as f64 / self.sample_rate as f64
    }
}

/// Decode a file, optionally keeping only the first `limit_secs` seconds.
/// Streams that do not report a sample rate are read at 44.1 kHz.
pub fn decode_file(path: &Path, limit_secs: Option<f64>) -> Result<DecodedAudio> {
    decode_file_with_rate(path, limit_secs, DEFAULT_SAMPLE_RATE)
}

/// Like [`decode_file`], with the sample rate to assume when the container
/// does not carry one.
pub fn decode_file_with_rate(
    path: &Path,
    limit_secs: Option<f64>,
    fallback_sample_rate: u32,
) -> Result<DecodedAudio> {
    validate_sample_rate(fallback_sample_rate)?;
    let (mut channels, sample_rate) = match decode_with_symphonia(path) {
        Ok((channels, reported)) => (
            channels,
            resolve_sample_rate(reported, fallback_sample_rate, path),
        ),
        Err(e) if is_wav(path) => {
            warn!(
                "Symphonia could not decode {} ({}); retrying with WAV reader",
                path.display(),
                e
            );
            decode_wav(path)?
        }
        Err(e) => return Err(e),
    };

    if let Some(limit) = limit_secs {
        truncate_channels(&mut channels, sample_rate, limit);
    }

    let file_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    Ok(DecodedAudio {
        channels,
        sample_rate,
        file_name,
        extension,
        file_hash: file_hash(path)?,
    })
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav") || e.eq_ignore_ascii_case("wave"))
        .unwrap_or(false)
}

fn resolve_sample_rate(reported: Option<u32>, fallback: u32, path: &Path) -> u32 {
    match reported {
        Some(rate) if rate > 0 => rate,
        _ => {
            warn!(
                "{} does not specify a sample rate; assuming {} Hz",
                path.display(),
                fallback
            );
            fallback
        }
    }
}

fn decode_with_symphonia(path: &Path) -> Result<(Vec<Vec<i16>>, Option<u32>)> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(ext.to_str().unwrap_or(""));
    }

    let meta_opts = MetadataOptions::default();
    let fmt_opts = FormatOptions::default();

    let mut probed = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| FingerprintError::Decode(format!("failed to probe format: {}", e)))?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| FingerprintError::Decode("no supported audio track".to_string()))?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate;

    let dec_opts = DecoderOptions::default();
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &dec_opts)
        .map_err(|e| FingerprintError::Decode(format!("failed to create decoder: {}", e)))?;

    let mut interleaved: Vec<i16> = Vec::new();
    let mut channel_count = 0usize;
    let mut sample_buf: Option<SampleBuffer<i16>> = None;

    loop {
        let packet = match probed.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(FingerprintError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(SymphoniaError::DecodeError(msg)) => {
                debug!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(FingerprintError::Decode(e.to_string())),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            channel_count = spec.channels.count();
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            interleaved.extend_from_slice(buf.samples());
        }
    }

    if channel_count == 0 || interleaved.is_empty() {
        return Err(FingerprintError::Decode("no audio samples decoded".to_string()));
    }

    Ok((deinterleave(&interleaved, channel_count), sample_rate))
}

/// Read a WAV file with `hound`, scaling any bit depth to the 16-bit range
pub fn decode_wav(path: &Path) -> Result<(Vec<Vec<i16>>, u32)> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| FingerprintError::Decode(format!("WAV reader: {}", e)))?;
    let spec = reader.spec();
    let channel_count = spec.channels as usize;
    if channel_count == 0 {
        return Err(FingerprintError::Decode("WAV reports 0 channels".to_string()));
    }

    let interleaved: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample as i32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| scale_int_to_i16(v, bits)))
                .collect::<std::result::Result<_, _>>()
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<std::result::Result<_, _>>(),
    }
    .map_err(|e| FingerprintError::Decode(format!("WAV reader: {}", e)))?;

    Ok((deinterleave(&interleaved, channel_count), spec.sample_rate))
}

fn scale_int_to_i16(value: i32, bits: i32) -> i16 {
    if bits > 16 {
        (value >> (bits - 16)) as i16
    } else {
        (value << (16 - bits)) as i16
    }
}

/// Split interleaved frames into one vector per channel; a trailing
/// partial frame is dropped.
pub fn deinterleave<T: Copy>(interleaved: &[T], channel_count: usize) -> Vec<Vec<T>> {
    let frames = interleaved.len() / channel_count;
    (0..channel_count)
        .map(|ch| {
            interleaved
                .chunks_exact(channel_count)
                .take(frames)
                .map(|frame| frame[ch])
                .collect()
        })
        .collect()
}

fn truncate_channels(channels: &mut [Vec<i16>], sample_rate: u32, limit_secs: f64) {
    let keep = (limit_secs.max(0.0) * sample_rate as f64) as usize;
    for channel in channels.iter_mut() {
        channel.truncate(keep);
    }
}
