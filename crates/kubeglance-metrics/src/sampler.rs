use std::path::Path;

use parking_lot::Mutex;
use sysinfo::{Disks, IS_SUPPORTED_SYSTEM, System};
use tracing::trace;

use crate::error::MetricsError;
use kubeglance_types::{CpuInfo, DiskInfo, MemoryInfo, percent_of};

/// Mount point reported by the disk reading
pub const ROOT_PATH: &str = "/";

/// Source of host resource readings
pub trait HostMetrics: Send + Sync {
    fn cpu(&self) -> Result<CpuInfo, MetricsError>;
    fn memory(&self) -> Result<MemoryInfo, MetricsError>;
    fn disk(&self) -> Result<DiskInfo, MetricsError>;
}

/// Samples the local machine through `sysinfo`
pub struct HostSampler {
    /// Kept between calls: CPU usage is measured against the previous refresh
    system: Mutex<System>,
}

impl HostSampler {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        Self {
            system: Mutex::new(system),
        }
    }

    fn ensure_supported() -> Result<(), MetricsError> {
        if IS_SUPPORTED_SYSTEM {
            Ok(())
        } else {
            Err(MetricsError::Unsupported)
        }
    }
}

impl Default for HostSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl HostMetrics for HostSampler {
    /// Usage since the previous sample, across all cores
    fn cpu(&self) -> Result<CpuInfo, MetricsError> {
        Self::ensure_supported()?;
        let mut system = self.system.lock();
        system.refresh_cpu_usage();
        let usage = f64::from(system.global_cpu_usage());
        trace!(usage, "sampled cpu");
        Ok(CpuInfo { usage })
    }

    fn memory(&self) -> Result<MemoryInfo, MetricsError> {
        Self::ensure_supported()?;
        let mut system = self.system.lock();
        system.refresh_memory();
        memory_info(
            system.total_memory(),
            system.used_memory(),
            system.free_memory(),
        )
    }

    fn disk(&self) -> Result<DiskInfo, MetricsError> {
        Self::ensure_supported()?;
        let disks = Disks::new_with_refreshed_list();
        let root = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new(ROOT_PATH))
            .ok_or_else(|| MetricsError::MountNotFound(ROOT_PATH.to_string()))?;
        disk_info(root.total_space(), root.available_space(), ROOT_PATH)
    }
}

/// Shape raw memory counters, rejecting a zero total
fn memory_info(total: u64, used: u64, free: u64) -> Result<MemoryInfo, MetricsError> {
    if total == 0 {
        return Err(MetricsError::Unavailable("memory"));
    }
    Ok(MemoryInfo {
        total,
        used,
        free,
        used_percent: percent_of(used, total),
    })
}

/// Shape filesystem counters. `available` is what an unprivileged process can
/// still write, so blocks reserved for root count as used.
fn disk_info(total: u64, available: u64, path: &str) -> Result<DiskInfo, MetricsError> {
    if total == 0 {
        return Err(MetricsError::Unavailable("disk"));
    }
    let free = available.min(total);
    let used = total - free;
    Ok(DiskInfo {
        total,
        used,
        free,
        used_percent: percent_of(used, total),
        path: path.to_string(),
    })
}
