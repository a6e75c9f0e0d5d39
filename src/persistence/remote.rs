use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use super::SessionStore;
use crate::config::RemoteConfig;

const SIGN_IN_ERROR: &str = "An error occurred while fetching your data, please try again later.";
const SAVE_ERROR: &str = "An error occurred while attempting to save your data.";

/// Name of the session cookie the server expects.
const SESSION_COOKIE: &str = "lp";

/// Errors returned by the account server.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The session is missing or expired. Never retried.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Network failure or any other non-success response.
    #[error("{message}")]
    Other {
        status: Option<u16>,
        message: String,
    },
}

impl RemoteError {
    pub fn message(&self) -> &str {
        match self {
            RemoteError::Unauthorized { message } => message,
            RemoteError::Other { message, .. } => message,
        }
    }
}

/// Payload of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignInResponse {
    /// Serialized library, as produced by `Library::save`.
    pub library: String,
    pub username: String,
}

/// The account server.
pub trait RemoteApi: Send + Sync + 'static {
    /// Resume the current session and fetch its library.
    fn sign_in(&self) -> impl Future<Output = Result<SignInResponse, RemoteError>> + Send;

    /// Replace the stored library with `data`.
    fn save_library(&self, data: String) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// [`RemoteApi`] over HTTP.
pub struct HttpRemote {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl HttpRemote {
    pub fn new(config: &RemoteConfig, session: Arc<dyn SessionStore>) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()
            .map_err(|e| RemoteError::Other {
                status: None,
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
        fallback_message: &str,
    ) -> Result<Response, RemoteError> {
        let url = format!("{}/{}/", self.base_url, path);
        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = self.session.token() {
            request = request.header(COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }

        let response = request.send().await.map_err(|e| {
            tracing::debug!(url = %url, error = %e, "Request failed");
            RemoteError::Other {
                status: None,
                message: fallback_message.to_string(),
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Servers report the reason in a `status` field of the JSON body.
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("status")?.as_str().map(str::to_string))
            .unwrap_or_else(|| fallback_message.to_string());

        tracing::debug!(url = %url, status = status.as_u16(), "Request rejected");
        if status == StatusCode::UNAUTHORIZED {
            Err(RemoteError::Unauthorized { message })
        } else {
            Err(RemoteError::Other {
                status: Some(status.as_u16()),
                message,
            })
        }
    }
}

impl RemoteApi for HttpRemote {
    async fn sign_in(&self) -> Result<SignInResponse, RemoteError> {
        let response = self
            .post("signin", serde_json::json!({}), SIGN_IN_ERROR)
            .await?;
        response
            .json::<SignInResponse>()
            .await
            .map_err(|e| RemoteError::Other {
                status: None,
                message: format!("Malformed sign-in response: {}", e),
            })
    }

    async fn save_library(&self, data: String) -> Result<(), RemoteError> {
        self.post("saveLibrary", serde_json::json!({ "data": data }), SAVE_ERROR)
            .await?;
        Ok(())
    }
}
