//! Prerequisite graph held in memory, built from the course catalog.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{evaluate_prerequisites, GraphError, PrerequisiteGraph, PrerequisiteStatus};
use crate::models::{normalize_code, Course, PrerequisiteRef};

/// Course code to declared prerequisites.
#[derive(Debug, Default)]
pub struct InMemoryPrerequisiteGraph {
    edges: RwLock<HashMap<String, Vec<PrerequisiteRef>>>,
}

impl InMemoryPrerequisiteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_courses(courses: &[Course]) -> Self {
        let graph = Self::new();
        for course in courses {
            graph.insert_course(course);
        }
        graph
    }

    /// Add or replace the prerequisites declared by `course`.
    pub fn insert_course(&self, course: &Course) {
        let course = course.clone().normalized();
        self.edges
            .write()
            .insert(course.course_id.clone(), course.prerequisite_refs().to_vec());
    }

    pub fn prerequisites_of(&self, course_id: &str) -> Option<Vec<PrerequisiteRef>> {
        self.edges.read().get(&normalize_code(course_id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.edges.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.read().is_empty()
    }
}

#[async_trait]
impl PrerequisiteGraph for InMemoryPrerequisiteGraph {
    fn is_configured(&self) -> bool {
        true
    }

    async fn check_prerequisites_completion(
        &self,
        course_id: &str,
        completed: &[String],
    ) -> Result<PrerequisiteStatus, GraphError> {
        // Courses the graph does not know have nothing to require
        let prereqs = self.prerequisites_of(course_id).unwrap_or_default();
        Ok(evaluate_prerequisites(&prereqs, completed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> InMemoryPrerequisiteGraph {
        InMemoryPrerequisiteGraph::from_courses(&[
            Course::new("CSYE6200", "Concepts of Object Oriented Design", "CSYE"),
            Course::new("csye6225", "Network Structures and Cloud Computing", "CSYE")
                .with_prerequisites(vec![PrerequisiteRef::new("csye6200", "")]),
        ])
    }

    #[tokio::test]
    async fn test_met_and_unmet() {
        let graph = graph();
        let none: Vec<String> = Vec::new();

        let status = graph
            .check_prerequisites_completion("CSYE6200", &none)
            .await
            .unwrap();
        assert!(status.prerequisites_met);

        let status = graph
            .check_prerequisites_completion("CSYE6225", &none)
            .await
            .unwrap();
        assert!(!status.prerequisites_met);
        assert_eq!(
            status.missing_prerequisites,
            vec![PrerequisiteRef::code("CSYE6200")]
        );

        let status = graph
            .check_prerequisites_completion("csye6225", &["CSYE6200".to_string()])
            .await
            .unwrap();
        assert!(status.prerequisites_met);
    }

    #[tokio::test]
    async fn test_unknown_course_is_met() {
        let status = graph()
            .check_prerequisites_completion("INFO9999", &[])
            .await
            .unwrap();
        assert_eq!(status, PrerequisiteStatus::met());
    }

    #[test]
    fn test_insert_replaces_edges() {
        let graph = graph();
        assert_eq!(graph.len(), 2);
        graph.insert_course(&Course::new("CSYE6225", "Cloud", "CSYE"));
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.prerequisites_of("csye6225"), Some(vec![]));
    }
}
