use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sysinfo::System;

use crate::domain::entities::sample::ResourceSample;
use crate::domain::ports::collector::{ResourceSampler, SampleError};

/// Window over which CPU usage is averaged.
pub const CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

#[cfg(windows)]
const ROOT_MOUNT: &str = "C:\\";
#[cfg(not(windows))]
const ROOT_MOUNT: &str = "/";

/// Returns `(numerator / denominator) * 100.0`, or `0.0` when `denominator` is zero.
#[allow(clippy::cast_precision_loss)]
fn safe_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        ((numerator as f64 / denominator as f64) * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Samples CPU and memory through `sysinfo`, root filesystem usage through
/// `statvfs` (sysinfo disks on Windows).
///
/// CPU usage is the delta between two refreshes one window apart. The
/// `System` lock is taken for each refresh and dropped while the window
/// elapses, so a sample never holds it across an await point.
pub struct SysinfoCollector {
    sys: Mutex<System>,
    cpu_window: Duration,
}

impl SysinfoCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::with_cpu_window(CPU_SAMPLE_WINDOW)
    }

    /// Collector with a custom CPU window, raised to sysinfo's minimum if shorter.
    #[must_use]
    pub fn with_cpu_window(window: Duration) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        Self {
            sys: Mutex::new(sys),
            cpu_window: window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, System>, SampleError> {
        self.sys
            .lock()
            .map_err(|e| SampleError::MetricsUnavailable(format!("system lock poisoned: {e}")))
    }

    async fn cpu_percent(&self) -> Result<f64, SampleError> {
        self.lock()?.refresh_cpu_usage();
        tokio::time::sleep(self.cpu_window).await;

        let mut sys = self.lock()?;
        sys.refresh_cpu_usage();
        if sys.cpus().is_empty() {
            return Err(SampleError::MetricsUnavailable(
                "no CPU reported by the OS".into(),
            ));
        }
        Ok(f64::from(sys.global_cpu_usage()).clamp(0.0, 100.0))
    }

    fn memory_percent(&self) -> Result<f64, SampleError> {
        let mut sys = self.lock()?;
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return Err(SampleError::MetricsUnavailable(
                "total memory reported as zero".into(),
            ));
        }
        // Same definition as `free`: memory not available to new allocations.
        let used = total.saturating_sub(sys.available_memory());
        Ok(safe_percent(used, total))
    }
}

impl Default for SysinfoCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceSampler for SysinfoCollector {
    async fn sample(&self) -> Result<ResourceSample, SampleError> {
        let cpu_percent = self.cpu_percent().await?;
        let memory_percent = self.memory_percent()?;
        let disk_percent = root_disk_percent()?;

        Ok(ResourceSample {
            cpu_percent,
            memory_percent,
            disk_percent,
            taken_at: chrono::Utc::now(),
        })
    }
}

/// Usage percentage the way `df` reports it: blocks reserved for the
/// superuser count neither as used nor as available.
///
/// Returns `None` for a filesystem that reports no usable blocks.
fn df_percent(blocks: u64, blocks_free: u64, blocks_available: u64, fragment_size: u64) -> Option<f64> {
    let used = blocks.saturating_sub(blocks_free).saturating_mul(fragment_size);
    let available = blocks_available.saturating_mul(fragment_size);
    let visible = used.saturating_add(available);
    (visible > 0).then(|| safe_percent(used, visible))
}

/// Usage of the filesystem mounted at the root.
#[cfg(unix)]
#[allow(clippy::useless_conversion)]
fn root_disk_percent() -> Result<f64, SampleError> {
    let stats = nix::sys::statvfs::statvfs(ROOT_MOUNT)
        .map_err(|e| SampleError::RootFilesystemNotFound(format!("{ROOT_MOUNT}: {e}")))?;

    df_percent(
        u64::from(stats.blocks()),
        u64::from(stats.blocks_free()),
        u64::from(stats.blocks_available()),
        u64::from(stats.fragment_size()),
    )
    .ok_or_else(|| {
        SampleError::MetricsUnavailable(format!("filesystem at {ROOT_MOUNT} reports zero size"))
    })
}

#[cfg(not(unix))]
fn root_disk_percent() -> Result<f64, SampleError> {
    let disks = sysinfo::Disks::new_with_refreshed_list();
    let root = disks
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new(ROOT_MOUNT))
        .ok_or_else(|| SampleError::RootFilesystemNotFound(ROOT_MOUNT.to_string()))?;

    // No reserved-block figure here; free and available are the same.
    let total = root.total_space();
    let available = root.available_space();
    df_percent(total, available, available, 1).ok_or_else(|| {
        SampleError::MetricsUnavailable(format!("filesystem at {ROOT_MOUNT} reports zero size"))
    })
}
