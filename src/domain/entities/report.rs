use std::fmt::Write;

use chrono::{DateTime, Local, Utc};

use crate::domain::entities::sample::ResourceSample;
use crate::domain::value_objects::metric::Metric;
use crate::domain::value_objects::thresholds::ThresholdSet;

pub const REPORT_RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricStatus {
    Ok,
    Alert,
}

impl std::fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Alert => f.write_str("ALERT"),
        }
    }
}

/// One row of the usage report.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricLine {
    pub metric: Metric,
    pub value: f64,
    pub threshold: f64,
    pub status: MetricStatus,
}

impl MetricLine {
    /// Everything on the row except the status word.
    #[must_use]
    pub fn describe(&self) -> String {
        let label = format!("{} Usage", self.metric.label());
        format!(
            "{label:<13}: {:>5.1}% (Threshold: {}%)",
            self.value, self.threshold
        )
    }
}

/// Structured usage report for a single sample.
///
/// Breach status is decided by [`ThresholdSet::is_breached`], the same rule
/// the evaluator uses, so the report and the alerts never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleReport {
    pub taken_at: DateTime<Utc>,
    pub lines: Vec<MetricLine>,
}

impl SampleReport {
    #[must_use]
    pub fn build(sample: &ResourceSample, thresholds: &ThresholdSet) -> Self {
        let lines = Metric::ALL
            .iter()
            .map(|&metric| {
                let value = sample.value(metric);
                let status = if thresholds.is_breached(metric, value) {
                    MetricStatus::Alert
                } else {
                    MetricStatus::Ok
                };
                MetricLine {
                    metric,
                    value,
                    threshold: thresholds.limit(metric),
                    status,
                }
            })
            .collect();

        Self {
            taken_at: sample.taken_at,
            lines,
        }
    }

    #[must_use]
    pub fn header(&self) -> String {
        format!(
            "System Resource Usage Report - {}",
            self.taken_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
        )
    }

    #[must_use]
    pub fn rule() -> String {
        "=".repeat(REPORT_RULE_WIDTH)
    }

    /// Plain-text rendering, no colour markup.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.header());
        let _ = writeln!(out, "{}", Self::rule());
        for line in &self.lines {
            let _ = writeln!(out, "{} - {}", line.describe(), line.status);
        }
        out.push_str(&Self::rule());
        out
    }

    #[must_use]
    pub fn alerting(&self) -> Vec<Metric> {
        self.lines
            .iter()
            .filter(|l| l.status == MetricStatus::Alert)
            .map(|l| l.metric)
            .collect()
    }
}

/// Renders a sample and its breach status as the fixed-layout text report.
#[must_use]
pub fn render_report(sample: &ResourceSample, thresholds: &ThresholdSet) -> String {
    SampleReport::build(sample, thresholds).render()
}
