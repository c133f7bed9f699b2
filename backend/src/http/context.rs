//! Per-request context for authenticated course endpoints.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use super::error::AppError;
use super::state::AppState;
use crate::auth::{parse_bearer, AuthError, CurrentUser};
use crate::db::repository::CourseRepository;
use crate::graph::PrerequisiteGraph;
use crate::services::CourseQueryHandler;

/// The authenticated caller plus the collaborator handles for this request.
///
/// Handles are reference counted and released when the request finishes.
pub struct RequestContext {
    pub user: CurrentUser,
    pub repository: Arc<dyn CourseRepository>,
    pub graph: Arc<dyn PrerequisiteGraph>,
}

impl RequestContext {
    pub fn queries(&self) -> CourseQueryHandler<'_> {
        CourseQueryHandler::new(self.repository.as_ref(), self.graph.as_ref())
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidFormat)?;
        let token = parse_bearer(header)?;
        let user = state.identity.resolve(token).await?;

        Ok(Self {
            user,
            repository: Arc::clone(&state.repository),
            graph: Arc::clone(&state.graph),
        })
    }
}
