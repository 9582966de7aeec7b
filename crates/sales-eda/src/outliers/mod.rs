//! Outlier module.
//!
//! Interquartile-range (IQR) outlier detection and clipping for numeric
//! columns. Bounds are always recomputed from the current column values.

mod bounds;
mod detector;
mod handler;

pub use bounds::IqrBounds;
pub use detector::OutlierDetector;
pub use handler::OutlierHandler;
