//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionStore`: the current credential, shared with the API client
//! - `SessionStorage`: durable backends (`FileStorage`, `MemoryStorage`)
//! - `Credentials`: validated username/password for login and signup
//!
//! The session is persisted to `auth.json` on every change and restored at
//! startup. Tokens do not expire client-side; the server decides.

pub mod credentials;
pub mod session;
pub mod storage;

pub use credentials::Credentials;
pub use session::{SessionData, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
