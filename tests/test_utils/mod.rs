// Shared helpers for the integration tests: deterministic signal
// generators, WAV writing and CLI invocation.
#![allow(dead_code)]

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use uuid::Uuid;

pub const TEST_SAMPLE_RATE: u32 = 44100;

pub fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_audioprintr"))
}

pub fn run_audioprintr<P: AsRef<std::ffi::OsStr>>(file_path: P) -> Command {
    let mut cmd = Command::new(binary_path());
    cmd.arg(file_path);
    cmd
}

pub fn run_json_analysis<P: AsRef<std::ffi::OsStr>>(file_path: P) -> std::process::Output {
    run_audioprintr(file_path)
        .arg("--format")
        .arg("json")
        .output()
        .expect("Failed to execute with json format")
}

/// Fresh, empty directory under the system temp dir
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("audioprintr-test-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

/// Minimal linear congruential generator; repeatable across platforms
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform in [-1, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    }
}

pub fn silence(len: usize) -> Vec<i16> {
    vec![0; len]
}

pub fn white_noise(len: usize, amplitude: f64, seed: u64) -> Vec<i16> {
    let mut rng = Lcg::new(seed);
    (0..len)
        .map(|_| (rng.next_f64() * amplitude).round() as i16)
        .collect()
}

/// Sequence of Hann-shaped tone bursts, each a short chord of two partials.
/// Frequencies step through a fixed pattern so every burst sits elsewhere
/// in the spectrum.
pub fn tone_bursts(sample_rate: u32, seconds: f64, seed: u64) -> Vec<f64> {
    let len = (sample_rate as f64 * seconds) as usize;
    let burst_len = (sample_rate as f64 * 0.4) as usize;
    let mut rng = Lcg::new(seed);
    let mut signal = vec![0.0; len];

    let mut start = 0;
    while start + burst_len <= len {
        let f1 = 300.0 + (rng.next_f64() + 1.0) * 2500.0;
        let f2 = f1 * 1.5 + 200.0;
        for n in 0..burst_len {
            let env = 0.5 - 0.5 * (2.0 * PI * n as f64 / (burst_len - 1) as f64).cos();
            let t = (start + n) as f64 / sample_rate as f64;
            signal[start + n] += env
                * (8000.0 * (2.0 * PI * f1 * t).sin() + 4000.0 * (2.0 * PI * f2 * t).sin());
        }
        start += burst_len / 2 + burst_len / 4;
    }
    signal
}

/// Tone bursts over continuous low-level noise, unquantized. No sample run
/// is silent, so no spectrogram cell has zero power.
pub fn noisy_bursts(sample_rate: u32, seconds: f64, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed ^ 0x5eed);
    tone_bursts(sample_rate, seconds, seed)
        .into_iter()
        .map(|s| s + rng.next_f64() * 200.0)
        .collect()
}

/// Tone bursts plus low-level noise, quantized to 16 bits
pub fn music_like(sample_rate: u32, seconds: f64, seed: u64) -> Vec<i16> {
    let mut rng = Lcg::new(seed ^ 0x5eed);
    tone_bursts(sample_rate, seconds, seed)
        .into_iter()
        .map(|s| (s + rng.next_f64() * 200.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect()
}

/// Write 16-bit PCM, one vector per channel
pub fn write_wav(path: &Path, sample_rate: u32, channels: &[Vec<i16>]) {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV");
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    for i in 0..frames {
        for channel in channels {
            writer.write_sample(channel[i]).expect("Failed to write sample");
        }
    }
    writer.finalize().expect("Failed to finalize WAV");
}
