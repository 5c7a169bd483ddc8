//! Visualization of spectrograms and their detected peaks

mod peak_map;

pub use peak_map::{render_peak_map, save_peak_map};
