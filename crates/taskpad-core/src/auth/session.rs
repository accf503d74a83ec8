use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, AuthEndpoint};

use super::credentials::Credentials;
use super::storage::{MemoryStorage, SessionStorage};

/// The persisted session record. `token` is set exactly when a login or
/// signup has succeeded and no logout has happened since.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub authenticated_at: Option<DateTime<Utc>>,
}

impl SessionData {
    pub fn authenticated(token: String, username: String) -> Self {
        Self {
            token: Some(token),
            username: Some(username),
            authenticated_at: Some(Utc::now()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn age_minutes(&self) -> Option<i64> {
        self.authenticated_at
            .map(|at| (Utc::now() - at).num_minutes())
    }

    /// How long ago the session was established, for display
    pub fn age_display(&self) -> String {
        let Some(minutes) = self.age_minutes() else {
            return "never".to_string();
        };
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

struct Inner {
    data: RwLock<SessionData>,
    storage: Box<dyn SessionStorage>,
}

/// Process-wide holder of the current credential.
///
/// Clone is cheap and every clone sees the same state, so the API client can
/// hold one and read the latest token on each request. Every mutation
/// replaces the whole record and writes it to the storage backend.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Rehydrate from storage. A missing or unreadable record yields an
    /// empty session.
    pub fn open(storage: impl SessionStorage + 'static) -> Self {
        let data = match storage.load() {
            Ok(Some(data)) => {
                debug!(authenticated = data.is_authenticated(), "Session loaded");
                data
            }
            Ok(None) => {
                debug!("No session data found");
                SessionData::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load session, starting signed out");
                SessionData::default()
            }
        };

        Self {
            inner: Arc::new(Inner {
                data: RwLock::new(data),
                storage: Box::new(storage),
            }),
        }
    }

    /// Session that is never written to disk.
    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::new())
    }

    /// Copy of the current record
    pub fn snapshot(&self) -> SessionData {
        self.inner
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current bearer token, read fresh on every call
    pub fn token(&self) -> Option<String> {
        self.inner
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    pub fn username(&self) -> Option<String> {
        self.inner
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .username
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    /// Log in with existing credentials. On failure the current session is
    /// left untouched and the error is returned.
    pub async fn login(&self, api: &ApiClient, username: &str, password: &str) -> Result<()> {
        self.authenticate(api, AuthEndpoint::Login, username, password)
            .await
    }

    /// Register a new account and log in with it.
    pub async fn signup(&self, api: &ApiClient, username: &str, password: &str) -> Result<()> {
        self.authenticate(api, AuthEndpoint::Signup, username, password)
            .await
    }

    /// Clear the credential and persist the cleared record. Never fails.
    pub fn logout(&self) {
        let previous = self.username();
        self.replace(SessionData::default());
        info!(username = ?previous, "Logged out");
    }

    async fn authenticate(
        &self,
        api: &ApiClient,
        endpoint: AuthEndpoint,
        username: &str,
        password: &str,
    ) -> Result<()> {
        let credentials = Credentials::new(username, password)?;

        let token = match api.authenticate(endpoint, &credentials).await {
            Ok(token) => token,
            Err(e) => {
                warn!(endpoint = ?endpoint, username = %credentials.username, error = %e, "Authentication failed");
                return Err(e);
            }
        };

        self.replace(SessionData::authenticated(token, credentials.username.clone()));
        info!(endpoint = ?endpoint, username = %credentials.username, "Authenticated");
        Ok(())
    }

    /// Overwrite memory and storage under one write guard, so concurrent
    /// mutations land in both copies in the same order.
    fn replace(&self, data: SessionData) {
        let mut current = self
            .inner
            .data
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Err(e) = self.inner.storage.save(&data) {
            warn!(error = %e, "Failed to save session");
        }
        *current = data;
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.snapshot();
        f.debug_struct("SessionStore")
            .field("authenticated", &data.is_authenticated())
            .field("username", &data.username)
            .finish()
    }
}
