pub mod collector;
pub mod notifier;
pub mod sink;

pub use collector::{ResourceSampler, SampleError};
pub use notifier::{Notifier, NotifyError};
pub use sink::{ReportSink, SinkError};
