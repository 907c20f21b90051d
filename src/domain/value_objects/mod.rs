pub mod metric;
pub mod thresholds;

pub use metric::Metric;
pub use thresholds::ThresholdSet;
