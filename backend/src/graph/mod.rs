//! Prerequisite graph.
//!
//! A graph answers one question: given the courses a student has completed,
//! may they take a particular course? Prerequisites of a course are
//! alternatives, so completing any single one of them is enough.
//!
//! Two backends exist: [`InMemoryPrerequisiteGraph`], built from the catalog,
//! and (behind the `neo4j-graph` feature) a Neo4j-backed graph. When neither is
//! configured [`UnconfiguredGraph`] is used and callers skip eligibility
//! checks entirely.

pub mod memory;
#[cfg(feature = "neo4j-graph")]
pub mod neo4j;

pub use memory::InMemoryPrerequisiteGraph;
#[cfg(feature = "neo4j-graph")]
pub use neo4j::Neo4jPrerequisiteGraph;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{normalize_code, Course, PrerequisiteRef};

/// Outcome of checking one course against a student's completed courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteStatus {
    pub prerequisites_met: bool,
    /// Declared prerequisites the student has not completed; empty when met
    pub missing_prerequisites: Vec<PrerequisiteRef>,
}

impl PrerequisiteStatus {
    pub fn met() -> Self {
        Self {
            prerequisites_met: true,
            missing_prerequisites: Vec::new(),
        }
    }

    pub fn unmet(missing_prerequisites: Vec<PrerequisiteRef>) -> Self {
        Self {
            prerequisites_met: false,
            missing_prerequisites,
        }
    }
}

/// Decide eligibility from a course's declared prerequisites.
///
/// Met when nothing is required or when any prerequisite appears in
/// `completed` (codes compare case-insensitively). Otherwise every declared
/// prerequisite is reported missing, in declaration order.
pub fn evaluate_prerequisites(
    prerequisites: &[PrerequisiteRef],
    completed: &[String],
) -> PrerequisiteStatus {
    if prerequisites.is_empty() {
        return PrerequisiteStatus::met();
    }

    let completed: HashSet<String> = completed.iter().map(|c| normalize_code(c)).collect();
    if prerequisites
        .iter()
        .any(|p| completed.contains(&normalize_code(&p.course_id)))
    {
        PrerequisiteStatus::met()
    } else {
        PrerequisiteStatus::unmet(prerequisites.to_vec())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Prerequisite graph is not configured")]
    NotConfigured,

    #[error("Graph connection error: {0}")]
    Connection(String),

    #[error("Graph query error: {0}")]
    Query(String),
}

/// Source of prerequisite information.
#[async_trait]
pub trait PrerequisiteGraph: Send + Sync {
    /// Whether eligibility checks can run at all.
    fn is_configured(&self) -> bool;

    /// Check `course_id` against the student's `completed` course codes.
    async fn check_prerequisites_completion(
        &self,
        course_id: &str,
        completed: &[String],
    ) -> Result<PrerequisiteStatus, GraphError>;
}

/// Placeholder used when no graph backend is set up.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGraph;

#[async_trait]
impl PrerequisiteGraph for UnconfiguredGraph {
    fn is_configured(&self) -> bool {
        false
    }

    async fn check_prerequisites_completion(
        &self,
        _course_id: &str,
        _completed: &[String],
    ) -> Result<PrerequisiteStatus, GraphError> {
        Err(GraphError::NotConfigured)
    }
}

/// Graph backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphType {
    None,
    Memory,
    Neo4j,
}

impl FromStr for GraphType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" | "" => Ok(Self::None),
            "memory" | "local" => Ok(Self::Memory),
            "neo4j" => Ok(Self::Neo4j),
            _ => Err(format!("Unknown graph type: {}", s)),
        }
    }
}

/// Build the graph selected by `config`.
///
/// The in-memory graph is seeded from `courses`; with nothing to seed it from
/// it would call every course satisfiable, so an empty catalog yields
/// [`UnconfiguredGraph`] instead. Neo4j connects using the `[neo4j]` settings
/// and likewise falls back when no URI is set.
pub async fn create_graph(
    config: &AppConfig,
    courses: &[Course],
) -> Result<Arc<dyn PrerequisiteGraph>, GraphError> {
    let graph_type = config.graph_type().map_err(GraphError::Connection)?;
    match graph_type {
        GraphType::None => Ok(Arc::new(UnconfiguredGraph)),
        GraphType::Memory if courses.is_empty() => {
            log::warn!("In-memory prerequisite graph has no catalog to load; prerequisite checks disabled");
            Ok(Arc::new(UnconfiguredGraph))
        }
        GraphType::Memory => Ok(Arc::new(InMemoryPrerequisiteGraph::from_courses(courses))),
        GraphType::Neo4j => {
            if !config.neo4j.is_configured() {
                log::warn!("GRAPH_TYPE is neo4j but no Neo4j URI is set; prerequisite checks disabled");
                return Ok(Arc::new(UnconfiguredGraph));
            }
            #[cfg(feature = "neo4j-graph")]
            {
                let graph = Neo4jPrerequisiteGraph::connect(
                    &config.neo4j.uri,
                    &config.neo4j.user,
                    &config.neo4j.password,
                )
                .await?;
                Ok(Arc::new(graph))
            }
            #[cfg(not(feature = "neo4j-graph"))]
            {
                Err(GraphError::Connection(
                    "Neo4j graph feature not enabled".to_string(),
                ))
            }
        }
    }
}
