//! Prerequisite graph stored in Neo4j.
//!
//! Expects `(:Course {course_id, name})` nodes linked by
//! `(course)-[:REQUIRES]->(prerequisite)` relationships.

use async_trait::async_trait;
use neo4rs::{query, Graph};

use super::{evaluate_prerequisites, GraphError, PrerequisiteGraph, PrerequisiteStatus};
use crate::models::{normalize_code, PrerequisiteRef};

const PREREQUISITES_QUERY: &str = "MATCH (c:Course {course_id: $course_id})-[:REQUIRES]->(p:Course) \
     RETURN p.course_id AS course_id, coalesce(p.name, p.course_id) AS name \
     ORDER BY course_id";

pub struct Neo4jPrerequisiteGraph {
    graph: Graph,
}

impl Neo4jPrerequisiteGraph {
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self, GraphError> {
        let graph = Graph::new(uri, user, password)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;
        log::info!("Connected to Neo4j prerequisite graph at {}", uri);
        Ok(Self { graph })
    }

    async fn prerequisites_of(&self, course_id: &str) -> Result<Vec<PrerequisiteRef>, GraphError> {
        let q = query(PREREQUISITES_QUERY).param("course_id", normalize_code(course_id));
        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| GraphError::Query(e.to_string()))?;

        let mut prereqs = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| GraphError::Query(e.to_string()))?
        {
            let code: String = row
                .get("course_id")
                .map_err(|e| GraphError::Query(e.to_string()))?;
            let name: String = row
                .get("name")
                .map_err(|e| GraphError::Query(e.to_string()))?;
            prereqs.push(PrerequisiteRef::new(normalize_code(&code), name));
        }
        Ok(prereqs)
    }
}

#[async_trait]
impl PrerequisiteGraph for Neo4jPrerequisiteGraph {
    fn is_configured(&self) -> bool {
        true
    }

    async fn check_prerequisites_completion(
        &self,
        course_id: &str,
        completed: &[String],
    ) -> Result<PrerequisiteStatus, GraphError> {
        let prereqs = self.prerequisites_of(course_id).await?;
        Ok(evaluate_prerequisites(&prereqs, completed))
    }
}
