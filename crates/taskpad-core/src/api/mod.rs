//! REST API client module for the to-do service.
//!
//! This module provides the `ApiClient` for the task endpoints and the
//! login/signup token exchange. Every request carries the session's
//! current bearer token, if there is one.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthEndpoint};
pub use error::ApiError;
