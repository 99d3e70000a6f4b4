use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;

use kubeglance_k8s::ClusterError;
use kubeglance_metrics::MetricsError;
use kubeglance_types::ErrorBody;

/// Any failure behind an endpoint. All variants render as the same 500 shape.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("sampling task failed: {0}")]
    Task(#[from] JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(self.to_string())),
        )
            .into_response()
    }
}
