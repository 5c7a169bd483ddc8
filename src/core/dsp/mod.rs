//! Digital Signal Processing utilities

mod fft;
mod windows;

pub use fft::{ComplexFftTransform, RealFftTransform, SpectrumTransform};
pub use windows::{create_window, window_power, WindowType};
