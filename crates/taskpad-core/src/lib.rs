//! Core library for taskpad.
//!
//! Holds the pieces shared by every front end: the persisted session, the
//! authenticated API client, configuration and the task models.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, AuthEndpoint};
pub use auth::{Credentials, FileStorage, MemoryStorage, SessionData, SessionStorage, SessionStore};
pub use config::Config;
pub use models::{NewTask, Task, TaskPatch};
