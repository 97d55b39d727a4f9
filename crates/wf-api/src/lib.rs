//! # wf-api
//!
//! REST API v1 for Wayfarer. The handler modules are thin: each one wires
//! a repository into the generic CRUD helpers in [`factory`], adds the
//! resource's role restrictions, and leaves query refinement to
//! `wf-queries`.

pub mod error;
pub mod extractors;
pub mod factory;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::{AppState, AuthenticatedUser};
pub use routes::router;
