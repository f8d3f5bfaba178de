#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod classifier;
mod entry;
mod error;
mod exercise;
mod heatmap;
mod muscle;
mod search;
mod summary;

pub use classifier::*;
pub use entry::*;
pub use error::*;
pub use exercise::*;
pub use heatmap::*;
pub use muscle::*;
pub use search::*;
pub use summary::*;
