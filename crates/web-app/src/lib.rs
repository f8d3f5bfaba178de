#![warn(clippy::pedantic)]

pub mod chip;
pub mod heatmap;
pub mod log;
mod settings;

pub use settings::*;
