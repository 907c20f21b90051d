use crate::domain::entities::sample::ResourceSample;
use crate::domain::value_objects::metric::Metric;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Returns the metrics of `sample` that strictly exceed their threshold.
///
/// Pure function, no I/O. The result is always ordered cpu, memory, disk and
/// holds each metric at most once.
#[must_use]
pub fn evaluate(sample: &ResourceSample, thresholds: &ThresholdSet) -> Vec<Metric> {
    Metric::ALL
        .into_iter()
        .filter(|&metric| thresholds.is_breached(metric, sample.value(metric)))
        .collect()
}
