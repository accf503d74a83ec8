//! API client for the remote to-do service.
//!
//! `ApiClient` centralizes the base URL, timeout and JSON content type, and
//! attaches the current session token as a bearer header on every request.

use std::time::Duration;

use anyhow::{Context, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{Credentials, SessionStore};
use crate::config::Config;
use crate::models::{NewTask, Task, TaskPatch};

use super::ApiError;

/// Characters escaped when a task id is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const TASK_PATH: &str = "/task";

/// Remote authentication endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEndpoint {
    Login,
    Signup,
}

impl AuthEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            AuthEndpoint::Login => "/auth/login",
            AuthEndpoint::Signup => "/auth/signup",
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// API client for the to-do service.
/// Clone is cheap - reqwest::Client and SessionStore both share state via Arc.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Create a client from the application config
    pub fn new(config: &Config, session: SessionStore) -> Result<Self> {
        Self::with_base_url(&config.api_url, config.timeout(), session)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration, session: SessionStore) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn task_path(id: &str) -> String {
        format!("{}/{}", TASK_PATH, utf8_percent_encode(id, PATH_SEGMENT))
    }

    /// Headers carrying the session's current token. Built per request so a
    /// login or logout takes effect on the very next call.
    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.session.token() {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .context("Session token is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = self.url(path);
        let headers = self.auth_headers()?;
        debug!(
            method = %method,
            url = %url,
            authorized = headers.contains_key(header::AUTHORIZATION),
            "Sending request"
        );

        let mut request = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(ApiError::from_transport)
            .with_context(|| format!("Failed to send {} request to {}", method, url))?;

        match Self::check_response(response).await {
            Ok(response) => Ok(response),
            Err(e) => {
                warn!(method = %method, url = %url, error = %e, "Request failed");
                Err(e).with_context(|| format!("{} {} failed", method, url))
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let url = response.url().to_string();
        response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout
                } else {
                    ApiError::InvalidResponse(e.to_string())
                }
            })
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::decode(response).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        Self::decode(response).await
    }

    // ===== Authentication =====

    /// Exchange credentials for a token. Does not touch the session; callers
    /// go through `SessionStore::login` / `SessionStore::signup`.
    pub async fn authenticate(&self, endpoint: AuthEndpoint, credentials: &Credentials) -> Result<String> {
        let auth: AuthResponse = self.post(endpoint.path(), credentials).await?;
        match auth.token.filter(|t| !t.is_empty()) {
            Some(token) => Ok(token),
            None => {
                warn!(
                    endpoint = ?endpoint,
                    message = auth.message.as_deref().unwrap_or("Unknown error"),
                    "Authentication response had no token"
                );
                Err(ApiError::MissingToken.into())
            }
        }
    }

    // ===== Tasks =====

    /// Fetch every task owned by the current user
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.get(TASK_PATH).await
    }

    /// Create an incomplete task. Blank titles are rejected without a request.
    pub async fn create_task(&self, title: &str) -> Result<Task> {
        let title = non_blank_title(title)?;
        self.post(TASK_PATH, &NewTask::new(title)).await
    }

    pub async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        if patch.is_empty() {
            return Err(ApiError::InvalidInput("nothing to update".to_string()).into());
        }
        self.patch(&Self::task_path(id), patch).await
    }

    pub async fn rename_task(&self, id: &str, title: &str) -> Result<Task> {
        let title = non_blank_title(title)?;
        self.update_task(id, &TaskPatch::title(title)).await
    }

    pub async fn set_completed(&self, id: &str, done: bool) -> Result<Task> {
        self.update_task(id, &TaskPatch::completed(done)).await
    }

    /// Flip the completion flag of a task as last seen by the caller
    pub async fn toggle_task(&self, task: &Task) -> Result<Task> {
        self.set_completed(&task.id, !task.is_completed).await
    }

    /// Delete a task. Any 2xx status (normally 204) counts as success.
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        self.send::<()>(Method::DELETE, &Self::task_path(id), None)
            .await?;
        Ok(())
    }
}

fn non_blank_title(title: &str) -> Result<&str, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        Err(ApiError::InvalidInput("task title must not be empty".to_string()))
    } else {
        Ok(title)
    }
}
