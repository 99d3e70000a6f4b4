use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("host metrics are not supported on this platform")]
    Unsupported,

    #[error("{0} reading unavailable")]
    Unavailable(&'static str),

    #[error("no filesystem mounted at {0}")]
    MountNotFound(String),
}
