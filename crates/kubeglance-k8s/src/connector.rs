//! Credential resolution
//!
//! The kubeconfig file is tried first. In-cluster credentials are only used
//! when the file cannot be read or loaded; a config that loads but points at an
//! unreachable server does not fall back.

use std::fmt;
use std::path::{Path, PathBuf};

use futures::FutureExt;
use futures::future::BoxFuture;
use kube::config::{KubeConfigOptions, Kubeconfig, KubeconfigError};
use tracing::{debug, info};

use crate::error::ClusterError;
use crate::snapshot::{SnapshotSource, collect_snapshot};
use kubeglance_types::ClusterInfo;

/// Where the resolved credentials came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    Kubeconfig(PathBuf),
    InCluster,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kubeconfig(path) => write!(f, "kubeconfig {}", path.display()),
            Self::InCluster => f.write_str("in-cluster service account"),
        }
    }
}

/// Resolves a cluster connection from a kubeconfig path
#[derive(Clone, Debug)]
pub struct ClusterConnector {
    kubeconfig: PathBuf,
}

impl ClusterConnector {
    pub fn new(kubeconfig: impl Into<PathBuf>) -> Self {
        Self {
            kubeconfig: kubeconfig.into(),
        }
    }

    pub fn kubeconfig_path(&self) -> &Path {
        &self.kubeconfig
    }

    /// Resolve a client config, falling back to in-cluster credentials
    pub async fn resolve_config(&self) -> Result<(kube::Config, CredentialSource), ClusterError> {
        let kubeconfig = match self.load_kubeconfig().await {
            Ok(config) => {
                return Ok((config, CredentialSource::Kubeconfig(self.kubeconfig.clone())));
            }
            Err(e) => e,
        };

        debug!(
            path = %self.kubeconfig.display(),
            error = %kubeconfig,
            "kubeconfig unusable, trying in-cluster credentials"
        );

        match kube::Config::incluster() {
            Ok(config) => Ok((config, CredentialSource::InCluster)),
            Err(in_cluster) => Err(ClusterError::Config {
                path: self.kubeconfig.clone(),
                kubeconfig,
                in_cluster,
            }),
        }
    }

    /// Build a client from whichever credentials resolve
    pub async fn connect(&self) -> Result<kube::Client, ClusterError> {
        let (config, source) = self.resolve_config().await?;
        info!(%source, cluster_url = %config.cluster_url, "connecting to cluster");
        kube::Client::try_from(config).map_err(ClusterError::Client)
    }

    async fn load_kubeconfig(&self) -> Result<kube::Config, KubeconfigError> {
        let kubeconfig = Kubeconfig::read_from(&self.kubeconfig)?;
        kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await
    }
}

impl SnapshotSource for ClusterConnector {
    fn snapshot(&self) -> BoxFuture<'_, Result<ClusterInfo, ClusterError>> {
        async move {
            let client = self.connect().await?;
            collect_snapshot(&client).await
        }
        .boxed()
    }
}
