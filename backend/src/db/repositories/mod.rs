//! `CourseRepository` backends: the in-memory store and, behind the
//! `postgres-repo` feature, Diesel on PostgreSQL.
pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PostgresConfig, PostgresRepository};
