use serde::{Deserialize, Serialize};

use super::metric::Metric;

/// Percentage limits above which a metric is considered in breach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// CPU usage percentage limit
    pub cpu: f64,
    /// Memory usage percentage limit
    pub memory: f64,
    /// Root filesystem usage percentage limit
    pub disk: f64,
}

impl ThresholdSet {
    #[must_use]
    pub const fn limit(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Cpu => self.cpu,
            Metric::Memory => self.memory,
            Metric::Disk => self.disk,
        }
    }

    /// A value breaches its limit only when strictly above it.
    #[must_use]
    pub fn is_breached(&self, metric: Metric, value: f64) -> bool {
        value > self.limit(metric)
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            cpu: 80.0,
            memory: 80.0,
            disk: 80.0,
        }
    }
}
