//! FFT backends behind a single real-to-complex transform seam

use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use crate::error::{FingerprintError, Result};

/// Forward transform of a real frame into its non-negative frequency half.
///
/// Implementations are shared across worker threads, so one planned
/// transform serves every window of a spectrogram.
pub trait SpectrumTransform: Send + Sync {
    /// Frame length the transform was planned for
    fn fft_size(&self) -> usize;

    /// Number of output bins (`len / 2 + 1`)
    fn bins(&self) -> usize {
        self.fft_size() / 2 + 1
    }

    /// Transform `input` into `output`. `input` may be used as scratch space
    /// and is left in an unspecified state.
    fn transform(&self, input: &mut [f64], output: &mut [Complex<f64>]) -> Result<()>;
}

fn check_lengths(expected_in: usize, expected_out: usize, input: usize, output: usize) -> Result<()> {
    if input != expected_in || output != expected_out {
        return Err(FingerprintError::Transform(format!(
            "buffer size mismatch: expected {} in / {} out, got {} / {}",
            expected_in, expected_out, input, output
        )));
    }
    Ok(())
}

/// Real-input FFT via `realfft`; the default backend
pub struct RealFftTransform {
    r2c: Arc<dyn RealToComplex<f64>>,
    fft_size: usize,
}

impl RealFftTransform {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        Self {
            r2c: planner.plan_fft_forward(fft_size),
            fft_size,
        }
    }
}

impl SpectrumTransform for RealFftTransform {
    fn fft_size(&self) -> usize {
        self.fft_size
    }

    fn transform(&self, input: &mut [f64], output: &mut [Complex<f64>]) -> Result<()> {
        check_lengths(self.fft_size, self.bins(), input.len(), output.len())?;
        self.r2c
            .process(input, output)
            .map_err(|e| FingerprintError::Transform(e.to_string()))
    }
}

/// Full complex FFT via `rustfft`, keeping the first half of the spectrum
pub struct ComplexFftTransform {
    fft: Arc<dyn Fft<f64>>,
    fft_size: usize,
}

impl ComplexFftTransform {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        Self {
            fft: planner.plan_fft_forward(fft_size),
            fft_size,
        }
    }
}

impl SpectrumTransform for ComplexFftTransform {
    fn fft_size(&self) -> usize {
        self.fft_size
    }

    fn transform(&self, input: &mut [f64], output: &mut [Complex<f64>]) -> Result<()> {
        check_lengths(self.fft_size, self.bins(), input.len(), output.len())?;

        let mut buffer: Vec<Complex<f64>> =
            input.iter().map(|&s| Complex::new(s, 0.0)).collect();
        self.fft.process(&mut buffer);

        output.copy_from_slice(&buffer[..output.len()]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(len: usize, cycles: f64) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * cycles * i as f64 / len as f64).sin())
            .collect()
    }

    #[test]
    fn test_bins() {
        assert_eq!(RealFftTransform::new(4096).fft_size(), 4096);
        assert_eq!(RealFftTransform::new(4096).bins(), 2049);
        assert_eq!(ComplexFftTransform::new(9).fft_size(), 9);
        assert_eq!(ComplexFftTransform::new(9).bins(), 5);
    }

    #[test]
    fn test_sine_lands_in_its_bin() {
        let transform = RealFftTransform::new(64);
        let mut input = sine(64, 8.0);
        let mut output = vec![Complex::new(0.0, 0.0); transform.bins()];
        transform.transform(&mut input, &mut output).unwrap();

        let peak = output
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 8);
        assert!((output[8].norm() - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_backends_agree() {
        for &size in &[16usize, 15, 1024] {
            let signal: Vec<f64> = (0..size).map(|i| ((i * 7919) % 101) as f64 - 50.0).collect();
            let real = RealFftTransform::new(size);
            let complex = ComplexFftTransform::new(size);

            let mut a_in = signal.clone();
            let mut b_in = signal.clone();
            let mut a_out = vec![Complex::new(0.0, 0.0); real.bins()];
            let mut b_out = vec![Complex::new(0.0, 0.0); complex.bins()];
            real.transform(&mut a_in, &mut a_out).unwrap();
            complex.transform(&mut b_in, &mut b_out).unwrap();

            for (a, b) in a_out.iter().zip(b_out.iter()) {
                assert!((a - b).norm() < 1e-6, "size {}: {} vs {}", size, a, b);
            }
        }
    }

    #[test]
    fn test_rejects_wrong_buffer_size() {
        let transform = RealFftTransform::new(32);
        let mut input = vec![0.0; 16];
        let mut output = vec![Complex::new(0.0, 0.0); 17];
        assert!(matches!(
            transform.transform(&mut input, &mut output),
            Err(FingerprintError::Transform(_))
        ));
    }
}
