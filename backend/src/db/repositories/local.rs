//! In-memory course repository for local development and tests.
//!
//! Matching is deliberately simple: case-insensitive substring tiers over
//! the course code, name and description.

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::cmp::Ordering;

use crate::db::repository::{
    CoursePage, CourseQuery, CourseRepository, ErrorContext, RepositoryError, RepositoryResult,
    ScoredCourse,
};
use crate::models::{normalize_code, Course, Major};

pub const SCORE_EXACT_CODE: f64 = 1.0;
pub const SCORE_CODE: f64 = 0.9;
pub const SCORE_NAME: f64 = 0.7;
pub const SCORE_DESCRIPTION: f64 = 0.5;

/// Relevance of `course` for an already lower-cased needle, `None` when it does not match.
pub fn match_score(course: &Course, needle: &str) -> Option<f64> {
    let code = course.course_id.to_lowercase();
    if code == needle {
        return Some(SCORE_EXACT_CODE);
    }
    if code.contains(needle) {
        return Some(SCORE_CODE);
    }
    if course.course_name.to_lowercase().contains(needle) {
        return Some(SCORE_NAME);
    }
    course
        .course_description
        .as_deref()
        .filter(|d| d.to_lowercase().contains(needle))
        .map(|_| SCORE_DESCRIPTION)
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct LocalRepository {
    courses: RwLock<Vec<Course>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with `courses` (normalised, later duplicates win).
    pub fn with_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        let repo = Self::new();
        {
            let mut guard = repo.courses.write();
            for course in courses {
                upsert(&mut guard, course.normalized());
            }
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.courses.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.read().is_empty()
    }
}

fn upsert(courses: &mut Vec<Course>, course: Course) {
    match courses
        .iter_mut()
        .find(|c| c.course_id.eq_ignore_ascii_case(&course.course_id))
    {
        Some(existing) => *existing = course,
        None => courses.push(course),
    }
}

#[async_trait]
impl CourseRepository for LocalRepository {
    async fn search_courses(&self, query: &CourseQuery) -> RepositoryResult<CoursePage> {
        let needle = query.text.trim().to_lowercase();
        if needle.is_empty() {
            return Err(RepositoryError::validation_with_context(
                "Search query cannot be empty",
                ErrorContext::new("search_courses").with_entity("course"),
            ));
        }

        let courses = self.courses.read();
        let mut matches: Vec<ScoredCourse> = courses
            .iter()
            .filter(|c| query.major.map_or(true, |m| m.matches(&c.major)))
            .filter_map(|c| {
                match_score(c, &needle).map(|relevance_score| ScoredCourse {
                    course: c.clone(),
                    relevance_score,
                })
            })
            .collect();
        drop(courses);

        matches.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.course.course_id.cmp(&b.course.course_id))
        });

        let total_count = matches.len();
        let hits: Vec<ScoredCourse> = matches
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();
        debug!(
            "local search '{}' matched {} courses, returning {}",
            query.text,
            total_count,
            hits.len()
        );

        Ok(CoursePage { hits, total_count })
    }

    async fn get_course(&self, key: &str) -> RepositoryResult<Option<Course>> {
        Ok(self
            .courses
            .read()
            .iter()
            .find(|c| c.matches_key(key))
            .cloned())
    }

    async fn list_courses_by_major(
        &self,
        major: Major,
        limit: usize,
    ) -> RepositoryResult<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .courses
            .read()
            .iter()
            .filter(|c| major.matches(&c.major))
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.course_id.cmp(&b.course_id));
        courses.truncate(limit);
        Ok(courses)
    }

    /// All or nothing: the batch is checked before anything is written.
    async fn store_courses(&self, courses: &[Course]) -> RepositoryResult<usize> {
        if let Some(blank) = courses
            .iter()
            .find(|c| normalize_code(&c.course_id).is_empty())
        {
            return Err(RepositoryError::validation_with_context(
                "Course code cannot be empty",
                ErrorContext::new("store_courses")
                    .with_entity("course")
                    .with_entity_id(blank.id),
            ));
        }

        let mut guard = self.courses.write();
        for course in courses {
            upsert(&mut guard, course.clone().normalized());
        }
        Ok(courses.len())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
