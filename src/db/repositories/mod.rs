//! Repository implementations.
//!
//! - `local`: in-memory implementation for unit testing and local development
//! - `postgres`: Diesel-backed PostgreSQL implementation (production)

pub mod local;

#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;

#[cfg(feature = "postgres-repo")]
pub use postgres::PostgresRepository;

/// Ten-character uppercase verification code for payment pickups.
///
/// Shared by both backends so codes look identical regardless of storage.
pub(crate) fn new_verification_code() -> String {
    uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(10)
        .collect()
}
