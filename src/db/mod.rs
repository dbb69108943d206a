//! Storage layer: repository traits and implementations.
//!
//! The engine consumes storage exclusively through the
//! [`repository::AppointmentRepository`] trait. Implementations live under
//! [`repositories`]; the in-memory [`repositories::LocalRepository`] backs
//! unit tests and local development.

pub mod repositories;
pub mod repository;

#[cfg(feature = "local-repo")]
pub use repositories::LocalRepository;
pub use repository::{AppointmentRepository, RepositoryError, RepositoryResult};
