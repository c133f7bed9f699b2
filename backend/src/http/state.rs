//! Application state for the HTTP server.

use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::db::repository::CourseRepository;
use crate::graph::PrerequisiteGraph;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Course storage
    pub repository: Arc<dyn CourseRepository>,
    /// Prerequisite lookups; may be unconfigured
    pub graph: Arc<dyn PrerequisiteGraph>,
    /// Bearer token resolution
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn CourseRepository>,
        graph: Arc<dyn PrerequisiteGraph>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            repository,
            graph,
            identity,
        }
    }
}
