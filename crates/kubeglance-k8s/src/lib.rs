//! Kubernetes client for kubeglance
//!
//! This crate resolves cluster credentials and builds point-in-time snapshots
//! of node and pod placement.

mod connector;
mod error;
mod snapshot;

pub use connector::{ClusterConnector, CredentialSource};
pub use error::ClusterError;
pub use snapshot::{ClusterApi, SnapshotSource, build_cluster_info, collect_snapshot};

// Re-export types that are used in our public API
pub use kubeglance_types::{ClusterInfo, PodPlacement};
