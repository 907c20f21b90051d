use crate::domain::value_objects::metric::Metric;

/// A breach that passed the cooldown check and is about to be notified.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub metric: Metric,
    pub observed: f64,
    pub threshold: f64,
    pub message: String,
}

impl AlertEvent {
    #[must_use]
    pub fn new(metric: Metric, observed: f64, threshold: f64) -> Self {
        Self {
            metric,
            observed,
            threshold,
            message: format!("{} usage is {observed:.1}%", metric.label()),
        }
    }

    #[must_use]
    pub fn subject(&self) -> String {
        format!("High {} Usage Alert", self.metric.label())
    }

    /// Plain-text notification body.
    #[must_use]
    pub fn body(&self) -> String {
        format!("{} (threshold: {}%)", self.message, self.threshold)
    }
}
