pub mod alert;
pub mod report;
pub mod sample;

pub use alert::AlertEvent;
pub use report::{render_report, MetricLine, MetricStatus, SampleReport};
pub use sample::ResourceSample;
