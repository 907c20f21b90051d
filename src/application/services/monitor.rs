use std::time::Duration;

use super::cooldown::CooldownTracker;
use crate::domain::entities::alert::AlertEvent;
use crate::domain::entities::report::SampleReport;
use crate::domain::ports::collector::{ResourceSampler, SampleError};
use crate::domain::ports::notifier::Notifier;
use crate::domain::ports::sink::ReportSink;
use crate::domain::rules::evaluate;
use crate::domain::value_objects::metric::Metric;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Where the monitor loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Sampling,
    Reporting,
    Evaluating,
    Notifying,
    Sleeping,
    Stopped,
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Sampling => "sampling",
            Self::Reporting => "reporting",
            Self::Evaluating => "evaluating",
            Self::Notifying => "notifying",
            Self::Sleeping => "sleeping",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Result of a single monitoring tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorCycleResult {
    pub breaches: Vec<Metric>,
    pub alerts_sent: Vec<Metric>,
    pub alerts_failed: Vec<Metric>,
    pub alerts_suppressed: Vec<Metric>,
    pub report_emitted: bool,
}

impl MonitorCycleResult {
    /// Metrics for which a notification was attempted this tick.
    #[must_use]
    pub fn alerts_attempted(&self) -> usize {
        self.alerts_sent.len() + self.alerts_failed.len()
    }
}

/// Orchestrates a monitoring tick: sample → report → evaluate → notify.
///
/// Owns the cooldown state; ticks run one at a time through `&mut self`, so
/// reads in tick N+1 see exactly the writes of ticks up to N.
pub struct MonitorService<'a> {
    sampler: &'a dyn ResourceSampler,
    notifier: &'a dyn Notifier,
    sink: &'a dyn ReportSink,
    thresholds: &'a ThresholdSet,
    alert_cooldown: Duration,
    cooldowns: CooldownTracker,
    state: MonitorState,
}

impl<'a> MonitorService<'a> {
    #[must_use]
    pub fn new(
        sampler: &'a dyn ResourceSampler,
        notifier: &'a dyn Notifier,
        sink: &'a dyn ReportSink,
        thresholds: &'a ThresholdSet,
        alert_cooldown: Duration,
    ) -> Self {
        Self {
            sampler,
            notifier,
            sink,
            thresholds,
            alert_cooldown,
            cooldowns: CooldownTracker::new(),
            state: MonitorState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> MonitorState {
        self.state
    }

    #[must_use]
    pub const fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    /// Enter the terminal state. Further ticks are refused.
    pub fn stop(&mut self) {
        self.transition(MonitorState::Stopped);
    }

    fn transition(&mut self, next: MonitorState) {
        tracing::trace!("Monitor state: {} -> {next}", self.state);
        self.state = next;
    }

    /// Run a single tick and leave the monitor in `Sleeping`.
    ///
    /// Sink and notifier failures are logged and never abort the tick.
    ///
    /// # Errors
    ///
    /// Returns the `SampleError` when sampling fails; nothing is reported,
    /// evaluated or notified in that case.
    pub async fn run_tick(&mut self) -> Result<MonitorCycleResult, SampleError> {
        if self.state == MonitorState::Stopped {
            tracing::debug!("Tick requested on a stopped monitor, ignoring");
            return Ok(MonitorCycleResult::default());
        }

        self.transition(MonitorState::Sampling);
        let sample = match self.sampler.sample().await {
            Ok(sample) => sample,
            Err(e) => {
                tracing::error!("Failed to get resource usage: {e}");
                self.transition(MonitorState::Sleeping);
                return Err(e);
            }
        };

        self.transition(MonitorState::Reporting);
        let report = SampleReport::build(&sample, self.thresholds);
        let report_emitted = match self.sink.emit(&report) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to emit usage report: {e}");
                false
            }
        };

        self.transition(MonitorState::Evaluating);
        let breaches = evaluate(&sample, self.thresholds);
        if breaches.is_empty() {
            tracing::debug!("System OK, no threshold exceeded");
        }

        self.transition(MonitorState::Notifying);
        let mut result = MonitorCycleResult {
            breaches: breaches.clone(),
            report_emitted,
            ..MonitorCycleResult::default()
        };

        let now = sample.taken_at;
        for metric in breaches {
            if !self
                .cooldowns
                .should_alert(metric, now, self.alert_cooldown)
            {
                tracing::debug!(
                    "{metric} above threshold but still in cooldown (last alert {:?})",
                    self.cooldowns.last_alert(metric)
                );
                result.alerts_suppressed.push(metric);
                continue;
            }

            let alert = AlertEvent::new(
                metric,
                sample.value(metric),
                self.thresholds.limit(metric),
            );
            let subject = alert.subject();
            let outcome = self.notifier.notify(&subject, &alert.body()).await;
            // An attempt consumes the cooldown even when delivery failed.
            self.cooldowns.record_alert(metric, now);

            match outcome {
                Ok(()) => {
                    tracing::info!("Alert sent: {subject}");
                    result.alerts_sent.push(metric);
                }
                Err(e) => {
                    tracing::error!("Failed to send {metric} alert ({subject}): {e}");
                    result.alerts_failed.push(metric);
                }
            }
        }

        self.transition(MonitorState::Sleeping);
        Ok(result)
    }
}
