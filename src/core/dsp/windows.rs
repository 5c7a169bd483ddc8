//! Window function implementations

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Symmetric raised cosine
    #[default]
    Hann,
    /// No tapering; mostly useful for checking spectral scaling
    Rectangular,
}

/// Create window function coefficients.
///
/// Hann is the symmetric form (zero at both ends), so a window of one
/// sample is `[1.0]`.
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    let denom = size.saturating_sub(1) as f64;
    (0..size)
        .map(|i| match window_type {
            WindowType::Hann => 0.5 - 0.5 * (2.0 * PI * i as f64 / denom).cos(),
            WindowType::Rectangular => 1.0,
        })
        .collect()
}

/// Sum of squared coefficients; normalizes power spectral density
pub fn window_power(window: &[f64]) -> f64 {
    window.iter().map(|w| w * w).sum()
}
