use std::path::PathBuf;

use kube::config::{InClusterError, KubeconfigError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    /// Neither the kubeconfig file nor in-cluster credentials resolved
    #[error(
        "failed to create k8s config: kubeconfig {}: {kubeconfig}; in-cluster: {in_cluster}",
        .path.display()
    )]
    Config {
        path: PathBuf,
        kubeconfig: KubeconfigError,
        in_cluster: InClusterError,
    },

    #[error("failed to create k8s client: {0}")]
    Client(#[source] kube::Error),

    #[error("failed to get {resource}: {source}")]
    Api {
        resource: &'static str,
        #[source]
        source: kube::Error,
    },
}

impl ClusterError {
    pub(crate) fn api(resource: &'static str) -> impl FnOnce(kube::Error) -> Self {
        move |source| Self::Api { resource, source }
    }

    /// True when no usable credentials were found
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Client(_))
    }
}
