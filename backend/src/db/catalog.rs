//! Course catalog files.
//!
//! A catalog is a JSON array of courses used to seed the local repository and
//! the in-memory prerequisite graph:
//!
//! ```json
//! [
//!   {
//!     "course_id": "CSYE6225",
//!     "course_name": "Network Structures and Cloud Computing",
//!     "major": "CSYE",
//!     "prerequisites": ["CSYE6200", {"course_id": "INFO5100", "name": "Application Engineering"}]
//!   }
//! ]
//! ```
//!
//! `id` is optional (a UUID is generated when absent) and `created_at` is RFC 3339.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{normalize_code, Course, CourseId, PrerequisiteRef};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogPrerequisite {
    Code(String),
    Detailed {
        course_id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<CatalogPrerequisite> for PrerequisiteRef {
    fn from(entry: CatalogPrerequisite) -> Self {
        match entry {
            CatalogPrerequisite::Code(code) => PrerequisiteRef::code(normalize_code(&code)),
            CatalogPrerequisite::Detailed { course_id, name } => {
                let course_id = normalize_code(&course_id);
                let name = name.unwrap_or_else(|| course_id.clone());
                PrerequisiteRef::new(course_id, name)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(default)]
    id: Option<uuid::Uuid>,
    course_id: String,
    course_name: String,
    #[serde(default)]
    course_description: Option<String>,
    major: String,
    #[serde(default)]
    domains: Option<Vec<String>>,
    #[serde(default)]
    skills_associated: Option<Vec<String>>,
    #[serde(default)]
    prerequisites: Option<Vec<CatalogPrerequisite>>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<CatalogEntry> for Course {
    fn from(entry: CatalogEntry) -> Self {
        Course {
            id: entry.id.map(CourseId::new).unwrap_or_else(CourseId::generate),
            course_id: entry.course_id,
            course_name: entry.course_name,
            course_description: entry.course_description,
            major: entry.major,
            domains: entry.domains,
            skills_associated: entry.skills_associated,
            prerequisites: entry
                .prerequisites
                .map(|p| p.into_iter().map(PrerequisiteRef::from).collect()),
            created_at: entry.created_at,
        }
        .normalized()
    }
}

/// Parse catalog JSON. Duplicate or blank course codes are rejected.
pub fn parse_catalog(json: &str) -> RepositoryResult<Vec<Course>> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(json).map_err(|e| {
        RepositoryError::validation_with_context(
            format!("Invalid course catalog: {e}"),
            ErrorContext::new("parse_catalog").with_entity("catalog"),
        )
    })?;

    let mut seen = HashSet::new();
    let mut courses = Vec::with_capacity(entries.len());
    for entry in entries {
        let course = Course::from(entry);
        if course.course_id.is_empty() {
            return Err(RepositoryError::validation_with_context(
                "Catalog entry has an empty course_id",
                ErrorContext::new("parse_catalog").with_entity("catalog"),
            ));
        }
        if !seen.insert(course.course_id.clone()) {
            return Err(RepositoryError::validation_with_context(
                format!("Duplicate course_id in catalog: {}", course.course_id),
                ErrorContext::new("parse_catalog")
                    .with_entity("course")
                    .with_entity_id(&course.course_id),
            ));
        }
        courses.push(course);
    }
    Ok(courses)
}

/// Read and parse a catalog file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> RepositoryResult<Vec<Course>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        RepositoryError::configuration(format!(
            "Failed to read course catalog {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_catalog(&content)
}
