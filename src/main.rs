use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kubeglance_k8s::ClusterConnector;
use kubeglance_metrics::HostSampler;
use kubeglance_server::{AppState, Server, ServerConfig};

mod config;

use config::{PartialSettings, Settings};

/// Kubeglance - HTTP snapshot of Kubernetes cluster topology and host utilization
#[derive(Parser, Debug)]
#[command(name = "kubeglance")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to kubeconfig file [default: $HOME/.kube/config]
    #[arg(long, env = "KUBECONFIG_PATH", value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// Port to run the server on [default: 8080]
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind to [default: 0.0.0.0]
    #[arg(long)]
    host: Option<String>,

    /// Optional TOML config file; flags take precedence over it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> PartialSettings {
        PartialSettings {
            kubeconfig: self.kubeconfig.clone(),
            port: self.port,
            host: self.host.clone(),
            log_level: None,
        }
    }

    fn settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => PartialSettings::load(path)?,
            None => PartialSettings::default(),
        };
        Ok(self.overrides().or(file).finish())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let result = run(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

async fn run(args: Args) -> Result<()> {
    let settings = args.settings()?;

    // RUST_LOG takes precedence over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&settings.log_level))
                .context("Invalid log level")?,
        )
        .with_writer(std::io::stderr)
        .init();

    info!(kubeconfig = %settings.kubeconfig.display(), "starting kubeglance");

    let state = AppState::new(
        ClusterConnector::new(settings.kubeconfig),
        HostSampler::new(),
    );
    let server = Server::new(
        ServerConfig::new().host(settings.host).port(settings.port),
        state,
    );
    let addr = server.addr();

    server
        .run()
        .await
        .with_context(|| format!("Server on {} failed", addr))
}
