//! # wf-db
//!
//! PostgreSQL persistence for Wayfarer: the connection pool, the generic
//! [`CrudRepository`] trait every resource implements, and one repository
//! per resource. List queries execute the [`wf_queries::SqlSelect`] the
//! feature builder rendered; everything else is plain parameterized SQL.

pub mod bookings;
pub mod pool;
pub mod repository;
pub mod reviews;
pub mod tours;
pub mod users;

pub use bookings::BookingRepository;
pub use pool::{Database, DatabaseConfig};
pub use repository::{CrudRepository, RepositoryError, RepositoryResult};
pub use reviews::ReviewRepository;
pub use tours::TourRepository;
pub use users::UserRepository;
