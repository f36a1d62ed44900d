//! Version badge state, fed by the backend's `/api/lastVersion` endpoint
//!
//! Kept apart from the search state: nothing orders the two.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Local backend address used when no override is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Body of a successful `/api/lastVersion` response
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn from_response(status: u16, body: &str) -> Self {
        let details = serde_json::from_str::<BackendErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status code {status}"));
        Self {
            message: format!("Backend API Error: {details}"),
        }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Backend API Error: {err}"),
        }
    }
}

/// Resolve the backend base URL from an optional override
pub fn backend_base_url(override_url: Option<&str>) -> String {
    override_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BACKEND_URL)
        .trim_end_matches('/')
        .to_string()
}

/// Normalize a `/api/lastVersion` response into the version string
pub fn parse_version_response(status: u16, body: &str) -> Result<String, BackendError> {
    if !(200..300).contains(&status) {
        return Err(BackendError::from_response(status, body));
    }

    serde_json::from_str::<VersionResponse>(body)
        .map(|r| r.version)
        .map_err(|e| BackendError::transport(format!("malformed response: {e}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum VersionState {
    #[default]
    Idle,
    Pending,
    Ready(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionAction {
    Pending,
    Fulfilled(String),
    Rejected(String),
    Clear,
}

pub fn reduce_version(state: &mut VersionState, action: VersionAction) {
    *state = match action {
        VersionAction::Pending => VersionState::Pending,
        VersionAction::Fulfilled(version) => VersionState::Ready(version),
        VersionAction::Rejected(message) => VersionState::Failed(message),
        VersionAction::Clear => VersionState::Idle,
    };
}

#[derive(Debug, Default)]
pub struct VersionStore {
    state: Mutex<VersionState>,
}

impl VersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, action: VersionAction) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        reduce_version(&mut state, action);
    }

    pub fn snapshot(&self) -> VersionState {
        self.state.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Run a one-shot version fetch, recording pending/success/failure
    pub async fn load<F>(&self, fetch: F)
    where
        F: std::future::Future<Output = Result<String, BackendError>>,
    {
        self.dispatch(VersionAction::Pending);
        match fetch.await {
            Ok(version) => self.dispatch(VersionAction::Fulfilled(version)),
            Err(err) => {
                log::warn!("version fetch failed: {}", err);
                self.dispatch(VersionAction::Rejected(err.message));
            }
        }
    }
}
