//! Course queries on behalf of an authenticated user.
//!
//! [`CourseQueryHandler`] runs the three course operations exposed over HTTP.
//! Search is the interesting one: hits from the repository are split into
//! courses the user may take and courses still blocked by prerequisites.

use log::{debug, info};

use super::error::QueryError;
use crate::auth::CurrentUser;
use crate::db::repository::CourseRepository;
use crate::db::services;
use crate::graph::PrerequisiteGraph;
use crate::models::Major;
use crate::routes::course::CourseRecord;
use crate::routes::major::MajorCoursesResponse;
use crate::routes::search::{AnnotatedCourse, SearchResponse, SearchResults};

pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const DEFAULT_MAJOR_LIMIT: usize = 50;
pub const MAX_MAJOR_LIMIT: usize = 200;

/// Parameters of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
    pub offset: usize,
    pub major: Option<String>,
    pub check_prerequisites: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
            major: None,
            check_prerequisites: true,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_major(mut self, major: impl Into<String>) -> Self {
        self.major = Some(major.into());
        self
    }

    pub fn with_check_prerequisites(mut self, check: bool) -> Self {
        self.check_prerequisites = check;
        self
    }
}

/// Borrowed view of the collaborators a request needs.
pub struct CourseQueryHandler<'a> {
    repository: &'a dyn CourseRepository,
    graph: &'a dyn PrerequisiteGraph,
}

impl<'a> CourseQueryHandler<'a> {
    pub fn new(repository: &'a dyn CourseRepository, graph: &'a dyn PrerequisiteGraph) -> Self {
        Self { repository, graph }
    }

    /// Search the catalog and, when possible, partition hits by eligibility.
    ///
    /// Eligibility is skipped (everything lands in `eligible_courses`) when
    /// `check_prerequisites` is off or the graph is not configured.
    pub async fn search(
        &self,
        user: &CurrentUser,
        request: &SearchRequest,
    ) -> Result<SearchResponse, QueryError> {
        let results = services::search_courses(
            self.repository,
            &request.query,
            request.limit,
            request.offset,
            request.major.as_deref(),
        )
        .await?;

        if !request.check_prerequisites || !self.graph.is_configured() {
            debug!(
                "prerequisite check skipped for user {} (requested: {}, graph configured: {})",
                user.id,
                request.check_prerequisites,
                self.graph.is_configured()
            );
            return Ok(SearchResponse::unchecked(results));
        }

        let response = partition_by_eligibility(self.graph, results, user).await?;
        info!(
            "prerequisites checked for user {}: {} eligible, {} ineligible",
            user.id, response.eligible_count, response.ineligible_count
        );
        Ok(response)
    }

    /// One course by code or UUID.
    pub async fn get_course(&self, course_id: &str) -> Result<CourseRecord, QueryError> {
        services::get_course_by_id(self.repository, course_id)
            .await?
            .map(CourseRecord::from)
            .ok_or_else(|| QueryError::NotFound(format!("Course with ID '{}' not found", course_id)))
    }

    /// Courses of a major given as user input (any case).
    pub async fn list_by_major(
        &self,
        major: &str,
        limit: usize,
    ) -> Result<MajorCoursesResponse, QueryError> {
        let major: Major = major
            .parse()
            .map_err(|e: crate::models::InvalidMajor| QueryError::Validation(e.to_string()))?;
        if limit == 0 || limit > MAX_MAJOR_LIMIT {
            return Err(QueryError::Validation(format!(
                "Limit must be between 1 and {MAX_MAJOR_LIMIT}"
            )));
        }

        let courses = services::get_courses_by_major(self.repository, major, limit).await?;
        Ok(MajorCoursesResponse::new(
            major,
            courses.into_iter().map(CourseRecord::from).collect(),
            limit,
        ))
    }
}

/// Ask the graph about every hit and split them, keeping search order in both halves.
pub async fn partition_by_eligibility(
    graph: &dyn PrerequisiteGraph,
    results: SearchResults,
    user: &CurrentUser,
) -> Result<SearchResponse, QueryError> {
    let mut eligible = Vec::new();
    let mut ineligible = Vec::new();

    for hit in &results.courses {
        let status = graph
            .check_prerequisites_completion(&hit.course.course_id, &user.completed_courses)
            .await?;
        if status.prerequisites_met {
            eligible.push(AnnotatedCourse::eligible(hit.clone(), status));
        } else {
            ineligible.push(AnnotatedCourse::ineligible(hit.clone(), status));
        }
    }

    Ok(SearchResponse::checked(
        results,
        eligible,
        ineligible,
        user.completed_courses.clone(),
    ))
}

#[cfg(test)]
#[path = "course_query_tests.rs"]
mod course_query_tests;
