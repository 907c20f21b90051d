use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::metric::Metric;

/// Host utilization at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub taken_at: DateTime<Utc>,
}

impl ResourceSample {
    #[must_use]
    pub const fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Cpu => self.cpu_percent,
            Metric::Memory => self.memory_percent,
            Metric::Disk => self.disk_percent,
        }
    }
}
