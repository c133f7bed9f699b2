//! Repository trait for course persistence.
//!
//! Implementations own storage and matching; callers go through
//! [`crate::db::services`], which validates input before reaching them.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{Course, Major};

/// Validated search request handed to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseQuery {
    /// Trimmed, non-empty search text
    pub text: String,
    pub limit: usize,
    pub offset: usize,
    pub major: Option<Major>,
}

/// A matched course and its relevance in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCourse {
    pub course: Course,
    pub relevance_score: f64,
}

/// One page of matches, ordered by descending relevance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoursePage {
    pub hits: Vec<ScoredCourse>,
    /// Number of matches before `limit`/`offset` were applied
    pub total_count: usize,
}

/// Storage backend for the course catalog.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Match `query.text` against course codes, names and descriptions.
    async fn search_courses(&self, query: &CourseQuery) -> RepositoryResult<CoursePage>;

    /// Look up a course by code (any case) or by UUID.
    async fn get_course(&self, key: &str) -> RepositoryResult<Option<Course>>;

    /// Courses of one major ordered by code, at most `limit` of them.
    async fn list_courses_by_major(&self, major: Major, limit: usize)
        -> RepositoryResult<Vec<Course>>;

    /// Insert or replace courses keyed by course code. Returns how many were written.
    async fn store_courses(&self, courses: &[Course]) -> RepositoryResult<usize>;

    async fn health_check(&self) -> RepositoryResult<bool>;
}
