use std::fmt;

use serde::Serialize;

use crate::api::ApiError;

/// Username/password pair sent to the login and signup endpoints.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    /// Build credentials, rejecting a blank username or an empty password.
    /// The username is trimmed; the password is sent exactly as given.
    pub fn new(username: &str, password: &str) -> Result<Self, ApiError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::InvalidInput("username is required".to_string()));
        }
        if password.is_empty() {
            return Err(ApiError::InvalidInput("password is required".to_string()));
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

// Never print the password, even in debug logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
