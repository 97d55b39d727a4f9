//! # wf-core
//!
//! Shared foundation for the Wayfarer tour-booking API: the error taxonomy,
//! identifier and role types, pagination primitives, and environment-driven
//! configuration. Every other crate in the workspace depends on this one.

pub mod config;
pub mod error;
pub mod pagination;
pub mod types;

pub use config::{AppConfig, AuthConfig};
pub use error::{AppError, AppResult, ValidationErrors};
pub use pagination::PageWindow;
pub use types::{Id, Role};
