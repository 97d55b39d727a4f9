//! # wf-auth
//!
//! Authentication and authorization for Wayfarer: JWT issuing and
//! validation, Argon2id password hashing, and the role checks handlers
//! perform on the authenticated user.

pub mod jwt;
pub mod password;
pub mod permissions;

pub use jwt::{extract_bearer_token, Claims, TokenError, TokenService};
pub use password::{hash_password, verify_password, PasswordError};
pub use permissions::CurrentUser;
