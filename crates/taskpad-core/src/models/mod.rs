//! Data models for the to-do service.
//!
//! - `Task`: a to-do item as returned by the service
//! - `NewTask`, `TaskPatch`: request bodies for create and partial update

pub mod task;

pub use task::{NewTask, Task, TaskPatch};
