//! HTTP handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;

use crate::{ApiError, AppState};
use kubeglance_metrics::{HostMetrics, MetricsError};
use kubeglance_types::{ClusterInfo, CpuInfo, DiskInfo, ErrorBody, MemoryInfo};

/// Live snapshot of nodes and pod placement.
pub async fn cluster_info(State(state): State<AppState>) -> Result<Json<ClusterInfo>, ApiError> {
    Ok(Json(state.cluster.snapshot().await?))
}

pub async fn cpu(State(state): State<AppState>) -> Result<Json<CpuInfo>, ApiError> {
    sample(state.host, |host| host.cpu()).await.map(Json)
}

pub async fn memory(State(state): State<AppState>) -> Result<Json<MemoryInfo>, ApiError> {
    sample(state.host, |host| host.memory()).await.map(Json)
}

pub async fn disk(State(state): State<AppState>) -> Result<Json<DiskInfo>, ApiError> {
    sample(state.host, |host| host.disk()).await.map(Json)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("not found")))
}

/// Run a sampler call on the blocking pool
async fn sample<T, F>(host: Arc<dyn HostMetrics>, read: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn HostMetrics) -> Result<T, MetricsError> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(move || read(host.as_ref())).await??)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, Response, header};
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use tower::ServiceExt;

    use crate::router;
    use kubeglance_k8s::{ClusterError, SnapshotSource};
    use kubeglance_types::PodPlacement;

    use super::*;

    /// Returns a fixed snapshot, or an API failure when `fail` is set
    struct FakeCluster {
        fail: bool,
    }

    impl SnapshotSource for FakeCluster {
        fn snapshot(&self) -> BoxFuture<'_, Result<ClusterInfo, ClusterError>> {
            let result = if self.fail {
                Err(ClusterError::Api {
                    resource: "nodes",
                    source: kube::Error::Api(kube::core::ErrorResponse {
                        status: "Failure".to_string(),
                        message: "connection refused".to_string(),
                        reason: "ServiceUnavailable".to_string(),
                        code: 503,
                    }),
                })
            } else {
                let mut info = ClusterInfo {
                    nodes: vec!["n1".to_string(), "n2".to_string()],
                    ..Default::default()
                };
                info.push_pod(PodPlacement::new("ns/p".to_string(), "n1".to_string()));
                Ok(info)
            };
            async move { result }.boxed()
        }
    }

    struct FakeHost {
        fail: bool,
    }

    impl HostMetrics for FakeHost {
        fn cpu(&self) -> Result<CpuInfo, MetricsError> {
            if self.fail {
                return Err(MetricsError::Unsupported);
            }
            Ok(CpuInfo { usage: 12.5 })
        }

        fn memory(&self) -> Result<MemoryInfo, MetricsError> {
            if self.fail {
                return Err(MetricsError::Unavailable("memory"));
            }
            Ok(MemoryInfo {
                total: 1000,
                used: 250,
                free: 700,
                used_percent: 25.0,
            })
        }

        fn disk(&self) -> Result<DiskInfo, MetricsError> {
            if self.fail {
                return Err(MetricsError::MountNotFound("/".to_string()));
            }
            Ok(DiskInfo {
                total: 2000,
                used: 500,
                free: 1500,
                used_percent: 25.0,
                path: "/".to_string(),
            })
        }
    }

    fn app(fail: bool) -> axum::Router {
        router(AppState::new(FakeCluster { fail }, FakeHost { fail }))
    }

    async fn send(app: axum::Router, method: Method, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_cors(response: &Response<Body>) {
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS]
                .to_str()
                .unwrap()
                .contains("GET")
        );
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));
    }

    #[tokio::test]
    async fn test_cluster_info_ok() {
        let response = send(app(false), Method::GET, "/api/k8sinfo").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);

        let body = json_body(response).await;
        assert_eq!(body["nodes"], json!(["n1", "n2"]));
        assert_eq!(body["pods"], json!([{ "name": "ns/p", "node": "n1" }]));
        assert_eq!(body["nodesPods"], json!({ "n1": ["ns/p"] }));
    }

    #[tokio::test]
    async fn test_cluster_failure_is_500_without_data() {
        let response = send(app(true), Method::GET, "/api/k8sinfo").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);

        let body = json_body(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("failed to get nodes"));
        assert!(body.get("nodes").is_none());
    }

    #[tokio::test]
    async fn test_metrics_ok() {
        let body = json_body(send(app(false), Method::GET, "/api/metrics/cpu").await).await;
        assert_eq!(body, json!({ "usage": 12.5 }));

        let body = json_body(send(app(false), Method::GET, "/api/metrics/memory").await).await;
        assert_eq!(
            body,
            json!({ "total": 1000, "used": 250, "free": 700, "usedPercent": 25.0 })
        );

        let body = json_body(send(app(false), Method::GET, "/api/metrics/disk").await).await;
        assert_eq!(body["path"], "/");
        assert_eq!(body["usedPercent"], 25.0);
    }

    #[tokio::test]
    async fn test_metrics_failure_is_500() {
        for uri in ["/api/metrics/cpu", "/api/metrics/memory", "/api/metrics/disk"] {
            let response = send(app(true), Method::GET, uri).await;
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);

            let body = json_body(response).await;
            assert!(!body["error"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_options_short_circuits() {
        for uri in [
            "/api/k8sinfo",
            "/api/metrics/cpu",
            "/api/metrics/memory",
            "/api/metrics/disk",
        ] {
            // The failing backends would turn into 500s if a handler ran
            let response = send(app(true), Method::OPTIONS, uri).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            assert_cors(&response);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            assert!(bytes.is_empty());
        }
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(app(true), Method::GET, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = send(app(false), Method::GET, "/api/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "not found");
    }
}
