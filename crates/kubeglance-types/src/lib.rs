//! Shared types for kubeglance
//!
//! This crate contains the JSON response bodies served by the HTTP front door.
//! Field names follow the wire format the dashboard expects (camelCase).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Cluster Topology Types
// ============================================================================

/// A pod and the node it is scheduled on
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodPlacement {
    /// Full name as `<namespace>/<pod-name>`
    pub name: String,
    /// Assigned node name, empty if the pod is not scheduled yet
    pub node: String,
}

impl PodPlacement {
    pub fn new(name: String, node: String) -> Self {
        Self { name, node }
    }

    pub fn is_scheduled(&self) -> bool {
        !self.node.is_empty()
    }
}

/// Snapshot of cluster nodes and pod placement
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    /// Node names in listing order
    pub nodes: Vec<String>,

    /// Pods across all namespaces in listing order
    pub pods: Vec<PodPlacement>,

    /// Pod full names grouped by assigned node.
    /// Unscheduled pods are grouped under the empty key.
    pub nodes_pods: BTreeMap<String, Vec<String>>,
}

impl ClusterInfo {
    /// Record a pod, keeping `pods` and `nodes_pods` in step
    pub fn push_pod(&mut self, placement: PodPlacement) {
        self.nodes_pods
            .entry(placement.node.clone())
            .or_default()
            .push(placement.name.clone());
        self.pods.push(placement);
    }

    /// Pods grouped under a node, empty if the node has none
    pub fn pods_on(&self, node: &str) -> &[String] {
        self.nodes_pods.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of pods with a node assignment
    pub fn scheduled_pod_count(&self) -> usize {
        self.pods.iter().filter(|p| p.is_scheduled()).count()
    }
}

// ============================================================================
// Host Metric Types
// ============================================================================

/// Aggregate CPU utilization
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Percentage across all cores, 0-100
    pub usage: f64,
}

/// Virtual memory utilization in bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
}

/// Filesystem utilization in bytes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfo {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
    /// Mount point the figures were read from
    pub path: String,
}

/// Percentage of `part` in `whole`, 0 when `whole` is 0
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

// ============================================================================
// Error Body
// ============================================================================

/// JSON body returned with every 500 response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
