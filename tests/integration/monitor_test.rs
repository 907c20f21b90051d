#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use hostwatch::application::services::monitor::{MonitorService, MonitorState};
use hostwatch::domain::entities::report::{render_report, SampleReport};
use hostwatch::domain::entities::sample::ResourceSample;
use hostwatch::domain::ports::collector::{ResourceSampler, SampleError};
use hostwatch::domain::ports::notifier::{NotifyError, Notifier};
use hostwatch::domain::ports::sink::{ReportSink, SinkError};
use hostwatch::domain::value_objects::metric::Metric;
use hostwatch::domain::value_objects::thresholds::ThresholdSet;
use hostwatch::presentation::cli::output::FileSink;

const COOLDOWN: Duration = Duration::from_secs(3600);

// ---------------------------------------------------------------------------
// ScriptedSampler
// ---------------------------------------------------------------------------

struct ScriptedSampler {
    script: Mutex<VecDeque<Result<ResourceSample, SampleError>>>,
}

impl ScriptedSampler {
    fn new(script: Vec<Result<ResourceSample, SampleError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl ResourceSampler for ScriptedSampler {
    async fn sample(&self) -> Result<ResourceSample, SampleError> {
        self.script
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(SampleError::MetricsUnavailable("script exhausted".into())))
    }
}

// ---------------------------------------------------------------------------
// TrackingNotifier
// ---------------------------------------------------------------------------

struct TrackingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl TrackingNotifier {
    const fn new() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            fail: false,
        }
    }

    const fn failing() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            fail: true,
        }
    }

    fn subjects(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("lock")
            .iter()
            .map(|(subject, _)| subject.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for TrackingNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("lock")
            .push((subject.to_string(), body.to_string()));
        if self.fail {
            return Err(NotifyError::Transport("connection refused".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TrackingSink
// ---------------------------------------------------------------------------

struct TrackingSink {
    reports: Mutex<Vec<String>>,
}

impl TrackingSink {
    const fn new() -> Self {
        Self {
            reports: Mutex::new(vec![]),
        }
    }

    fn count(&self) -> usize {
        self.reports.lock().expect("lock").len()
    }
}

impl ReportSink for TrackingSink {
    fn emit(&self, report: &SampleReport) -> Result<(), SinkError> {
        self.reports.lock().expect("lock").push(report.render());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid date")
}

fn sample_at(offset_secs: i64, cpu: f64, memory: f64, disk: f64) -> ResourceSample {
    ResourceSample {
        cpu_percent: cpu,
        memory_percent: memory,
        disk_percent: disk,
        taken_at: t0() + TimeDelta::seconds(offset_secs),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn healthy_host_reports_without_alerting() {
    let sampler = ScriptedSampler::new(vec![Ok(sample_at(0, 10.0, 20.0, 30.0))]);
    let notifier = TrackingNotifier::new();
    let sink = TrackingSink::new();
    let thresholds = ThresholdSet::default();
    let mut service = MonitorService::new(&sampler, &notifier, &sink, &thresholds, COOLDOWN);

    let result = service.run_tick().await.expect("tick");

    assert!(result.breaches.is_empty());
    assert!(result.report_emitted);
    assert_eq!(sink.count(), 1);
    assert!(notifier.subjects().is_empty());
    assert_eq!(service.state(), MonitorState::Sleeping);
}

#[tokio::test]
async fn cpu_alert_is_sent_once_per_cooldown_window() {
    let sampler = ScriptedSampler::new(vec![
        Ok(sample_at(0, 85.0, 40.0, 50.0)),
        Ok(sample_at(300, 86.0, 40.0, 50.0)),
        Ok(sample_at(3600, 87.0, 40.0, 50.0)),
        Ok(sample_at(3601, 88.0, 40.0, 50.0)),
    ]);
    let notifier = TrackingNotifier::new();
    let sink = TrackingSink::new();
    let thresholds = ThresholdSet::default();
    let mut service = MonitorService::new(&sampler, &notifier, &sink, &thresholds, COOLDOWN);

    let first = service.run_tick().await.expect("tick 1");
    assert_eq!(first.alerts_sent, vec![Metric::Cpu]);

    let second = service.run_tick().await.expect("tick 2");
    assert_eq!(second.alerts_suppressed, vec![Metric::Cpu]);

    // Exactly one window later is still inside the cooldown.
    let third = service.run_tick().await.expect("tick 3");
    assert_eq!(third.alerts_suppressed, vec![Metric::Cpu]);

    let fourth = service.run_tick().await.expect("tick 4");
    assert_eq!(fourth.alerts_sent, vec![Metric::Cpu]);

    assert_eq!(sink.count(), 4);
    assert_eq!(
        notifier.subjects(),
        vec!["High CPU Usage Alert", "High CPU Usage Alert"]
    );
    let (_, body) = notifier.sent.lock().expect("lock")[0].clone();
    assert!(body.contains("CPU usage is 85.0%"));
}

#[tokio::test]
async fn simultaneous_breaches_alert_in_metric_order() {
    let sampler = ScriptedSampler::new(vec![Ok(sample_at(0, 95.0, 91.0, 99.0))]);
    let notifier = TrackingNotifier::new();
    let sink = TrackingSink::new();
    let thresholds = ThresholdSet::default();
    let mut service = MonitorService::new(&sampler, &notifier, &sink, &thresholds, COOLDOWN);

    let result = service.run_tick().await.expect("tick");

    assert_eq!(result.breaches, vec![Metric::Cpu, Metric::Memory, Metric::Disk]);
    assert_eq!(
        notifier.subjects(),
        vec![
            "High CPU Usage Alert",
            "High Memory Usage Alert",
            "High Disk Usage Alert"
        ]
    );
}

#[tokio::test]
async fn cooldowns_are_tracked_per_metric() {
    let sampler = ScriptedSampler::new(vec![
        Ok(sample_at(0, 90.0, 10.0, 10.0)),
        Ok(sample_at(60, 90.0, 90.0, 10.0)),
    ]);
    let notifier = TrackingNotifier::new();
    let sink = TrackingSink::new();
    let thresholds = ThresholdSet::default();
    let mut service = MonitorService::new(&sampler, &notifier, &sink, &thresholds, COOLDOWN);

    service.run_tick().await.expect("tick 1");
    let second = service.run_tick().await.expect("tick 2");

    assert_eq!(second.alerts_suppressed, vec![Metric::Cpu]);
    assert_eq!(second.alerts_sent, vec![Metric::Memory]);
}

#[tokio::test]
async fn failed_delivery_still_starts_the_cooldown() {
    let sampler = ScriptedSampler::new(vec![
        Ok(sample_at(0, 90.0, 10.0, 10.0)),
        Ok(sample_at(300, 90.0, 10.0, 10.0)),
    ]);
    let notifier = TrackingNotifier::failing();
    let sink = TrackingSink::new();
    let thresholds = ThresholdSet::default();
    let mut service = MonitorService::new(&sampler, &notifier, &sink, &thresholds, COOLDOWN);

    let first = service.run_tick().await.expect("tick 1");
    assert_eq!(first.alerts_failed, vec![Metric::Cpu]);
    assert_eq!(service.cooldowns().last_alert(Metric::Cpu), Some(t0()));

    let second = service.run_tick().await.expect("tick 2");
    assert_eq!(second.alerts_suppressed, vec![Metric::Cpu]);
    assert_eq!(notifier.subjects().len(), 1);
}

#[tokio::test]
async fn sampling_failure_skips_the_tick_and_recovers() {
    let sampler = ScriptedSampler::new(vec![
        Err(SampleError::RootFilesystemNotFound("/".into())),
        Ok(sample_at(300, 90.0, 10.0, 10.0)),
    ]);
    let notifier = TrackingNotifier::new();
    let sink = TrackingSink::new();
    let thresholds = ThresholdSet::default();
    let mut service = MonitorService::new(&sampler, &notifier, &sink, &thresholds, COOLDOWN);

    let err = service.run_tick().await.expect_err("sampling should fail");
    assert!(matches!(err, SampleError::RootFilesystemNotFound(_)));
    assert_eq!(sink.count(), 0);
    assert!(notifier.subjects().is_empty());
    assert_eq!(service.state(), MonitorState::Sleeping);

    let result = service.run_tick().await.expect("second tick");
    assert_eq!(result.alerts_sent, vec![Metric::Cpu]);
    assert_eq!(sink.count(), 1);
}

#[tokio::test]
async fn file_sink_accumulates_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("reports").join("usage.log");
    let sink = FileSink::append(&path).expect("open sink");

    let samples = [sample_at(0, 10.0, 20.0, 30.0), sample_at(300, 85.0, 20.0, 30.0)];
    let sampler = ScriptedSampler::new(samples.iter().cloned().map(Ok).collect());
    let notifier = TrackingNotifier::new();
    let thresholds = ThresholdSet::default();
    let mut service = MonitorService::new(&sampler, &notifier, &sink, &thresholds, COOLDOWN);

    service.run_tick().await.expect("tick 1");
    service.run_tick().await.expect("tick 2");

    let written = std::fs::read_to_string(&path).expect("read output");
    let expected: String = samples
        .iter()
        .map(|s| format!("\n{}\n", render_report(s, &thresholds)))
        .collect();
    assert_eq!(written, expected);
    assert!(!written.contains('\u{1b}'), "file output must not be coloured");
}
