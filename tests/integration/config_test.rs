#![allow(clippy::expect_used)]

use std::path::Path;
use std::time::Duration;

use hostwatch::application::config::AppConfig;
use hostwatch::domain::value_objects::metric::Metric;
use hostwatch::domain::value_objects::thresholds::ThresholdSet;

fn example_config_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("docs/config.example.toml")
}

#[test]
fn shipped_example_matches_builtin_defaults() {
    let config = AppConfig::load_from(&example_config_path()).expect("example config parses");
    assert_eq!(config, AppConfig::default());
    assert!(config.validate().is_ok());
}

#[test]
fn thresholds_flow_into_breach_checks() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[thresholds]\ncpu = 50\ndisk = 95.5\n").expect("write config");

    let (config, loaded_from) = AppConfig::load_or_default(Some(&path));
    assert_eq!(loaded_from, path);

    let thresholds = ThresholdSet::from(&config.thresholds);
    assert!(thresholds.is_breached(Metric::Cpu, 50.1));
    assert!(!thresholds.is_breached(Metric::Cpu, 50.0));
    assert!(!thresholds.is_breached(Metric::Memory, 80.0));
    assert!(thresholds.is_breached(Metric::Disk, 96.0));
}

#[test]
fn command_line_interval_overrides_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "interval = 60\nalert_cooldown = 10\n").expect("write config");

    let (config, _) = AppConfig::load_or_default(Some(&path));
    assert_eq!(config.effective_interval(None), Duration::from_secs(60));
    assert_eq!(config.effective_interval(Some(5)), Duration::from_secs(5));
    assert_eq!(config.cooldown_window(), Duration::from_secs(10));
}

#[test]
fn broken_file_falls_back_but_invalid_values_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "[thresholds\ncpu = ").expect("write config");
    let (config, _) = AppConfig::load_or_default(Some(&broken));
    assert_eq!(config, AppConfig::default());

    let invalid = dir.path().join("invalid.toml");
    std::fs::write(&invalid, "interval = 0\n").expect("write config");
    let (config, _) = AppConfig::load_or_default(Some(&invalid));
    assert!(config.validate().is_err());
}

#[test]
fn command_line_interval_rescues_zero_interval_in_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "interval = 0\n").expect("write config");

    let (mut config, _) = AppConfig::load_or_default(Some(&path));
    config.apply_interval_override(Some(60));
    assert!(config.validate().is_ok());
    assert_eq!(config.effective_interval(Some(60)), Duration::from_secs(60));
}
