//! Course search service functions.
//!
//! These functions sit between callers and a [`CourseRepository`]: they
//! validate input, delegate to the repository and shape its output into the
//! route DTOs. Use them rather than calling the repository directly.

use log::debug;

use super::repository::{
    CourseQuery, CourseRepository, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::models::{Course, Major};
use crate::routes::course::CourseRecord;
use crate::routes::search::{SearchHit, SearchMetadata, SearchResults};

/// Longest accepted search query, in characters.
pub const MAX_QUERY_CHARS: usize = 200;
/// Largest page a single search may return.
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Search the catalog.
///
/// Fails with a validation error for a blank or over-long query, a limit
/// outside `1..=100`, or an unknown major filter.
pub async fn search_courses(
    repo: &dyn CourseRepository,
    query: &str,
    limit: usize,
    offset: usize,
    major_filter: Option<&str>,
) -> RepositoryResult<SearchResults> {
    let context = || ErrorContext::new("search_courses").with_entity("course");

    let text = query.trim();
    if text.is_empty() {
        return Err(RepositoryError::validation_with_context(
            "Search query cannot be empty",
            context(),
        ));
    }
    if text.chars().count() > MAX_QUERY_CHARS {
        return Err(RepositoryError::validation_with_context(
            format!("Search query cannot exceed {MAX_QUERY_CHARS} characters"),
            context(),
        ));
    }
    if limit == 0 || limit > MAX_SEARCH_LIMIT {
        return Err(RepositoryError::validation_with_context(
            format!("Limit must be between 1 and {MAX_SEARCH_LIMIT}"),
            context(),
        ));
    }
    let major = major_filter
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| {
            m.parse::<Major>().map_err(|_| {
                RepositoryError::validation_with_context(
                    format!(
                        "Invalid major filter '{}'. Must be one of: {}",
                        m,
                        Major::allowed_list()
                    ),
                    context(),
                )
            })
        })
        .transpose()?;

    let page = repo
        .search_courses(&CourseQuery {
            text: text.to_string(),
            limit,
            offset,
            major,
        })
        .await?;

    let courses: Vec<SearchHit> = page
        .hits
        .into_iter()
        .map(|hit| SearchHit {
            course: CourseRecord::from(hit.course),
            relevance_score: hit.relevance_score,
        })
        .collect();
    let returned_count = courses.len();
    debug!(
        "search '{}' returned {} of {} matches",
        text, returned_count, page.total_count
    );

    Ok(SearchResults {
        has_more: offset + returned_count < page.total_count,
        total_count: page.total_count,
        search_metadata: SearchMetadata {
            query: text.to_string(),
            limit,
            offset,
            major_filter: major.map(|m| m.as_str().to_string()),
            returned_count,
        },
        courses,
    })
}

/// Look up one course by code or UUID; `Ok(None)` when nothing matches.
pub async fn get_course_by_id(
    repo: &dyn CourseRepository,
    course_id: &str,
) -> RepositoryResult<Option<Course>> {
    if course_id.trim().is_empty() {
        return Ok(None);
    }
    repo.get_course(course_id).await
}

/// Courses of `major`, at most `limit` of them.
pub async fn get_courses_by_major(
    repo: &dyn CourseRepository,
    major: Major,
    limit: usize,
) -> RepositoryResult<Vec<Course>> {
    repo.list_courses_by_major(major, limit).await
}

/// Write `courses` to the repository (insert or replace by course code).
pub async fn store_courses(
    repo: &dyn CourseRepository,
    courses: &[Course],
) -> RepositoryResult<usize> {
    if courses.is_empty() {
        return Ok(0);
    }
    repo.store_courses(courses)
        .await
        .map_err(|e| e.with_operation("store_courses"))
}

pub async fn health_check(repo: &dyn CourseRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}
