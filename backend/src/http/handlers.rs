//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! course query service for the actual work.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use tracing::{error, info, warn};

use super::context::RequestContext;
use super::dto::{HealthResponse, MajorParams, SearchParams};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::routes::course::CourseRecord;
use crate::routes::major::MajorCoursesResponse;
use crate::routes::search::SearchResponse;
use crate::services::QueryError;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports repository reachability and whether prerequisite checks are available.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };
    let graph_status = if state.graph.is_configured() {
        "configured"
    } else {
        "not configured"
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
        graph: graph_status.to_string(),
    }))
}

// =============================================================================
// Course Endpoints
// =============================================================================

/// GET /v1/courses/search
///
/// Search courses and split the hits by the caller's eligibility.
pub async fn search_courses(
    ctx: RequestContext,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> HandlerResult<SearchResponse> {
    let request = params
        .map_err(|rejection| rejection.body_text())
        .and_then(|Query(params)| params.into_request())
        .map_err(|msg| {
            warn!(user_id = %ctx.user.id, "Rejected search parameters: {}", msg);
            AppError::BadRequest(format!("Invalid search parameters: {}", msg))
        })?;

    info!(
        user_id = %ctx.user.id,
        query = %request.query,
        limit = request.limit,
        offset = request.offset,
        major = ?request.major,
        "Course search requested"
    );

    match ctx.queries().search(&ctx.user, &request).await {
        Ok(response) => {
            info!(
                user_id = %ctx.user.id,
                query = %request.query,
                "Search returned {} of {} matches",
                response.results.courses.len(),
                response.results.total_count
            );
            if request.check_prerequisites {
                info!(
                    user_id = %ctx.user.id,
                    "Prerequisites checked: {} eligible, {} ineligible",
                    response.eligible_count,
                    response.ineligible_count
                );
            }
            Ok(Json(response))
        }
        Err(QueryError::Validation(msg)) => {
            warn!(user_id = %ctx.user.id, query = %request.query, "Invalid search: {}", msg);
            Err(AppError::BadRequest(format!(
                "Invalid search parameters: {}",
                msg
            )))
        }
        Err(e) => {
            error!(user_id = %ctx.user.id, query = %request.query, "Search failed: {}", e);
            Err(AppError::Internal("Search failed".to_string()))
        }
    }
}

/// GET /v1/courses/search/{course_id}
///
/// Fetch one course by code or UUID.
pub async fn get_course_by_id(
    ctx: RequestContext,
    Path(course_id): Path<String>,
) -> HandlerResult<CourseRecord> {
    info!(user_id = %ctx.user.id, course_id = %course_id, "Course lookup requested");

    match ctx.queries().get_course(&course_id).await {
        Ok(record) => Ok(Json(record)),
        Err(QueryError::NotFound(msg)) => {
            warn!(user_id = %ctx.user.id, course_id = %course_id, "{}", msg);
            Err(AppError::NotFound(msg))
        }
        Err(QueryError::Validation(msg)) => {
            warn!(user_id = %ctx.user.id, course_id = %course_id, "Invalid lookup: {}", msg);
            Err(AppError::BadRequest(msg))
        }
        Err(e) => {
            error!(user_id = %ctx.user.id, course_id = %course_id, "Course lookup failed: {}", e);
            Err(AppError::Internal("Failed to retrieve course".to_string()))
        }
    }
}

/// GET /v1/courses/major/{major}
///
/// List courses of one major.
pub async fn get_courses_by_major(
    ctx: RequestContext,
    Path(major): Path<String>,
    params: Result<Query<MajorParams>, QueryRejection>,
) -> HandlerResult<MajorCoursesResponse> {
    let limit = params
        .map_err(|rejection| rejection.body_text())
        .and_then(|Query(params)| params.limit())
        .map_err(|msg| {
            warn!(user_id = %ctx.user.id, major = %major, "Rejected major parameters: {}", msg);
            AppError::BadRequest(msg)
        })?;

    info!(user_id = %ctx.user.id, major = %major, limit, "Major listing requested");

    match ctx.queries().list_by_major(&major, limit).await {
        Ok(response) => {
            info!(
                user_id = %ctx.user.id,
                major = %response.major,
                "Listed {} courses",
                response.total_count
            );
            Ok(Json(response))
        }
        Err(QueryError::Validation(msg)) => {
            warn!(user_id = %ctx.user.id, major = %major, "{}", msg);
            Err(AppError::BadRequest(msg))
        }
        Err(e) => {
            error!(user_id = %ctx.user.id, major = %major, "Major listing failed: {}", e);
            Err(AppError::Internal("Failed to retrieve courses".to_string()))
        }
    }
}
