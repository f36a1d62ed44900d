use scrycards_core::catalog::REQUEST_TIMEOUT;
use scrycards_core::version::{backend_base_url, parse_version_response, BackendError};

/// Client for the project's own backend (version badge and health check)
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client for `override_url`, or the local default
    pub fn new(override_url: Option<&str>) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .user_agent(crate::scryfall::USER_AGENT)
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BackendError::transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: backend_base_url(override_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Latest active version, from `GET /api/lastVersion`
    pub async fn last_version(&self) -> Result<String, BackendError> {
        let url = format!("{}/api/lastVersion", self.base_url);
        log::debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(BackendError::transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(BackendError::transport)?;

        parse_version_response(status, &body)
    }

    /// Whether `GET /health` answers with a success status. Never fails.
    pub async fn check_connectivity(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                log::warn!(
                    "Backend API connection test failed: status {}",
                    response.status()
                );
                false
            }
            Err(err) => {
                log::warn!("Backend API connection test failed: {}", err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use scrycards_core::version::{VersionState, VersionStore};
    use serde_json::json;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn healthy_backend() -> Router {
        Router::new()
            .route("/api/lastVersion", get(|| async { Json(json!({ "version": "1.0.0" })) }))
            .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
    }

    fn empty_backend() -> Router {
        Router::new().route(
            "/api/lastVersion",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "No active version found" })),
                )
            }),
        )
    }

    #[tokio::test]
    async fn test_last_version() {
        let base = serve(healthy_backend()).await;
        let client = BackendClient::new(Some(&base)).unwrap();

        assert_eq!(client.last_version().await, Ok("1.0.0".to_string()));
        assert!(client.check_connectivity().await);
    }

    #[tokio::test]
    async fn test_last_version_error_body() {
        let base = serve(empty_backend()).await;
        let client = BackendClient::new(Some(&base)).unwrap();

        let err = client.last_version().await.unwrap_err();

        assert_eq!(err.message, "Backend API Error: No active version found");
        assert!(!client.check_connectivity().await);
    }

    #[tokio::test]
    async fn test_version_store_from_backend() {
        let base = serve(healthy_backend()).await;
        let client = BackendClient::new(Some(&base)).unwrap();
        let store = VersionStore::new();

        store.load(client.last_version()).await;

        assert_eq!(store.snapshot(), VersionState::Ready("1.0.0".to_string()));
    }

    #[test]
    fn test_default_base_url() {
        let client = BackendClient::new(None).unwrap();

        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
