//! Host resource sampling for kubeglance
//!
//! Point-in-time CPU, memory and root filesystem readings. Nothing is
//! aggregated over time.

mod error;
mod sampler;

pub use error::MetricsError;
pub use sampler::{HostMetrics, HostSampler, ROOT_PATH};

// Re-export types used in our public API
pub use kubeglance_types::{CpuInfo, DiskInfo, MemoryInfo};
