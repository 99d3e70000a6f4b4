//! Cluster snapshot aggregation

use futures::FutureExt;
use futures::future::BoxFuture;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::Api;
use kube::api::ListParams;
use tracing::debug;

use crate::error::ClusterError;
use kubeglance_types::{ClusterInfo, PodPlacement};

/// The two list calls a snapshot needs
pub trait ClusterApi: Send + Sync {
    /// All nodes, unfiltered
    fn list_nodes(&self) -> BoxFuture<'_, kube::Result<Vec<Node>>>;

    /// All pods across all namespaces, unfiltered
    fn list_pods(&self) -> BoxFuture<'_, kube::Result<Vec<Pod>>>;
}

impl ClusterApi for kube::Client {
    fn list_nodes(&self) -> BoxFuture<'_, kube::Result<Vec<Node>>> {
        let nodes: Api<Node> = Api::all(self.clone());
        async move { Ok(nodes.list(&ListParams::default()).await?.items) }.boxed()
    }

    fn list_pods(&self) -> BoxFuture<'_, kube::Result<Vec<Pod>>> {
        let pods: Api<Pod> = Api::all(self.clone());
        async move { Ok(pods.list(&ListParams::default()).await?.items) }.boxed()
    }
}

/// Anything that can produce a fresh cluster snapshot on demand
pub trait SnapshotSource: Send + Sync {
    fn snapshot(&self) -> BoxFuture<'_, Result<ClusterInfo, ClusterError>>;
}

/// List nodes then pods and aggregate them.
///
/// The two calls are independent reads, so a pod may name a node the node
/// listing did not return. Either call failing discards the whole snapshot.
pub async fn collect_snapshot<A: ClusterApi + ?Sized>(api: &A) -> Result<ClusterInfo, ClusterError> {
    let nodes = api.list_nodes().await.map_err(ClusterError::api("nodes"))?;
    let pods = api.list_pods().await.map_err(ClusterError::api("pods"))?;

    debug!(nodes = nodes.len(), pods = pods.len(), "listed cluster resources");

    Ok(build_cluster_info(nodes, pods))
}

/// Build a snapshot from raw listings, preserving listing order
pub fn build_cluster_info(nodes: Vec<Node>, pods: Vec<Pod>) -> ClusterInfo {
    let mut info = ClusterInfo {
        nodes: nodes
            .into_iter()
            .map(|node| node.metadata.name.unwrap_or_default())
            .collect(),
        pods: Vec::with_capacity(pods.len()),
        ..Default::default()
    };

    for pod in pods {
        info.push_pod(pod_placement(pod));
    }

    info
}

fn pod_placement(pod: Pod) -> PodPlacement {
    let namespace = pod.metadata.namespace.unwrap_or_default();
    let name = pod.metadata.name.unwrap_or_default();
    let node = pod.spec.and_then(|s| s.node_name).unwrap_or_default();

    PodPlacement::new(format!("{}/{}", namespace, name), node)
}
