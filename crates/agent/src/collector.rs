//! Host resource sampling via `sysinfo`.
//!
//! [`SystemCollector`] keeps a long-lived [`System`] so CPU usage is
//! measured as the delta between consecutive samples. The very first
//! sample after construction therefore reports whatever sysinfo computed
//! from the priming refresh, which is usually `0.0`.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use pulse_core::metrics::SystemSnapshot;
use sysinfo::{Disks, System};

/// Mount point whose usage is reported as `disk_used` / `disk_total`.
const ROOT_MOUNT: &str = "/";

/// A sample could not be taken.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// The platform did not report a required figure.
    #[error("{0} unavailable on this host")]
    Unavailable(&'static str),
}

/// Anything that can produce a point-in-time host snapshot.
///
/// Producers depend on this trait rather than on [`SystemCollector`] so
/// they can be driven by fixed readings in tests.
pub trait MetricsSource: Send + Sync + 'static {
    fn sample(&self) -> Result<SystemSnapshot, SampleError>;
}

/// Samples CPU, memory, load average and root-disk usage of the local host.
pub struct SystemCollector {
    system: Mutex<System>,
}

impl Default for SystemCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        // Prime the CPU counters so the next refresh yields a real delta.
        system.refresh_cpu_usage();
        system.refresh_memory();
        Self {
            system: Mutex::new(system),
        }
    }
}

impl MetricsSource for SystemCollector {
    fn sample(&self) -> Result<SystemSnapshot, SampleError> {
        let (cpu_usage, memory_used, memory_total) = {
            let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
            system.refresh_cpu_usage();
            system.refresh_memory();
            (
                f64::from(system.global_cpu_usage()),
                system.used_memory(),
                system.total_memory(),
            )
        };

        if memory_total == 0 {
            return Err(SampleError::Unavailable("memory"));
        }

        let (disk_used, disk_total) = root_disk_usage();

        Ok(SystemSnapshot {
            cpu_usage,
            memory_used,
            memory_total,
            load_avg: System::load_average().one,
            disk_used,
            disk_total,
        })
    }
}

/// Used and total bytes of the root filesystem, or zeros when the host
/// exposes no `/` mount (e.g. Windows or a minimal container).
fn root_disk_usage() -> (u64, u64) {
    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new(ROOT_MOUNT))
        .map(|disk| {
            let total = disk.total_space();
            (total.saturating_sub(disk.available_space()), total)
        })
        .unwrap_or_else(|| {
            tracing::debug!("No root mount found; reporting zero disk usage");
            (0, 0)
        })
}
