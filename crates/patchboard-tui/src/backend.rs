use async_trait::async_trait;
use patchboard_core::{Language, Snapshot, SnapshotError};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const START_PATH: &str = "/api/start-simulation";
const STATUS_PATH: &str = "/api/status";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend responded with HTTP {0}")]
    Status(u16),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// The two operations the workflow backend exposes.
#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    async fn start_simulation(&self, language: Language) -> Result<(), BackendError>;
    async fn fetch_status(&self) -> Result<Snapshot, BackendError>;
}

#[derive(Serialize)]
struct StartRequest<'a> {
    language: &'a str,
}

pub struct HttpBackend {
    client: reqwest::Client,
    start_url: String,
    status_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let base = base_url.trim().trim_end_matches('/');
        Ok(Self {
            client: builder.build()?,
            start_url: format!("{base}{START_PATH}"),
            status_url: format!("{base}{STATUS_PATH}"),
        })
    }
}

#[async_trait]
impl WorkflowBackend for HttpBackend {
    async fn start_simulation(&self, language: Language) -> Result<(), BackendError> {
        let response = self
            .client
            .post(&self.start_url)
            .json(&StartRequest {
                language: language.as_str(),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(BackendError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn fetch_status(&self) -> Result<Snapshot, BackendError> {
        let response = self.client.get(&self.status_url).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::Status(response.status().as_u16()));
        }
        let body = response.bytes().await?;
        Ok(Snapshot::from_slice(&body)?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use patchboard_core::WorkflowStatus;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn start_posts_selected_language() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let recorder = seen.clone();
        let router = Router::new().route(
            START_PATH,
            post(move |Json(body): Json<Value>| {
                let recorder = recorder.clone();
                async move {
                    *recorder.lock().unwrap() = Some(body);
                    Json(serde_json::json!({"message": "Simulation started"}))
                }
            }),
        );
        let backend = HttpBackend::new(&serve(router).await, None).unwrap();

        backend.start_simulation(Language::Go).await.unwrap();
        assert_eq!(
            seen.lock().unwrap().clone(),
            Some(serde_json::json!({"language": "go"}))
        );
    }

    #[tokio::test]
    async fn start_rejects_non_success_status() {
        let router = Router::new().route(
            START_PATH,
            post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let backend = HttpBackend::new(&serve(router).await, None).unwrap();

        let err = backend.start_simulation(Language::Python).await.unwrap_err();
        assert!(matches!(err, BackendError::Status(503)));
    }

    #[tokio::test]
    async fn status_decodes_snapshot_in_document_order() {
        let router = Router::new().route(
            STATUS_PATH,
            get(|| async {
                (
                    [("content-type", "application/json")],
                    r#"{"status":"RUNNING","current_step":"Hacking...",
                        "pr_details":{"title":"Feature","files":{"z.py":"1","a.py":"2"}}}"#,
                )
            }),
        );
        let backend = HttpBackend::new(&serve(router).await, Some(Duration::from_secs(5))).unwrap();

        let snapshot = backend.fetch_status().await.unwrap();
        assert_eq!(snapshot.status, WorkflowStatus::Running);
        let names: Vec<&str> = snapshot.file_names().collect();
        assert_eq!(names, vec!["z.py", "a.py"]);
    }

    #[tokio::test]
    async fn status_reports_garbled_payload() {
        let router = Router::new().route(STATUS_PATH, get(|| async { "{\"status\": " }));
        let backend = HttpBackend::new(&serve(router).await, None).unwrap();

        let err = backend.fetch_status().await.unwrap_err();
        assert!(matches!(err, BackendError::Snapshot(_)));
    }

    #[tokio::test]
    async fn status_reports_http_failure() {
        let router = Router::new().route(STATUS_PATH, get(|| async { StatusCode::BAD_GATEWAY }));
        let backend = HttpBackend::new(&serve(router).await, None).unwrap();

        let err = backend.fetch_status().await.unwrap_err();
        assert!(matches!(err, BackendError::Status(502)));
    }

    #[tokio::test]
    async fn slow_status_times_out() {
        let router = Router::new().route(
            STATUS_PATH,
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "{}"
            }),
        );
        let backend =
            HttpBackend::new(&serve(router).await, Some(Duration::from_millis(50))).unwrap();

        let err = backend.fetch_status().await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let backend = HttpBackend::new(&format!("http://{addr}"), None).unwrap();

        let err = backend.start_simulation(Language::Java).await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }
}
