use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::value_objects::metric::Metric;

/// Per-metric record of the last alert, used to rate-limit notifications.
///
/// A metric that has never alerted has no entry, which always passes the
/// check. State lives only as long as the tracker; a restart clears it.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_alert: HashMap<Metric, DateTime<Utc>>,
}

impl CooldownTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when more than `window` has elapsed since the last alert for `metric`.
    ///
    /// An elapsed time exactly equal to the window does not re-trigger. A `now`
    /// earlier than the recorded alert (clock stepped back) counts as inside
    /// the window.
    #[must_use]
    pub fn should_alert(&self, metric: Metric, now: DateTime<Utc>, window: Duration) -> bool {
        match self.last_alert.get(&metric) {
            Some(&last) => now.signed_duration_since(last) > to_delta(window),
            None => true,
        }
    }

    pub fn record_alert(&mut self, metric: Metric, now: DateTime<Utc>) {
        self.last_alert.insert(metric, now);
    }

    #[must_use]
    pub fn last_alert(&self, metric: Metric) -> Option<DateTime<Utc>> {
        self.last_alert.get(&metric).copied()
    }
}

/// Windows too large for `TimeDelta` saturate, which means "never again".
fn to_delta(window: Duration) -> TimeDelta {
    TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX)
}
