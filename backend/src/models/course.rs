use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Database identifier of a course record.
///
/// Distinct from the course code (`Course::course_id`); either one can be used
/// for lookups.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub Uuid);

impl CourseId {
    pub fn new(value: Uuid) -> Self {
        CourseId(value)
    }

    /// Fresh random identifier for a course that has none yet.
    pub fn generate() -> Self {
        CourseId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CourseId {
    fn from(value: Uuid) -> Self {
        CourseId(value)
    }
}

impl FromStr for CourseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(CourseId)
    }
}

/// Canonical form of a course code: trimmed and upper-cased ("csye6200 " -> "CSYE6200").
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Reference to another course, used both for declared prerequisites and for
/// prerequisites a caller is still missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteRef {
    /// Course code of the required course
    pub course_id: String,
    /// Display name shown to the caller
    pub name: String,
}

impl PrerequisiteRef {
    pub fn new(course_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            name: name.into(),
        }
    }

    /// Reference whose display name is the course code itself.
    pub fn code(course_id: impl Into<String>) -> Self {
        let course_id = course_id.into();
        Self {
            name: course_id.clone(),
            course_id,
        }
    }
}

/// A catalog course as stored by the repositories.
///
/// Optional collections mirror nullable columns; the HTTP layer renders a
/// missing collection as an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// Course code, e.g. "CSYE6200"
    pub course_id: String,
    pub course_name: String,
    pub course_description: Option<String>,
    pub major: String,
    pub domains: Option<Vec<String>>,
    pub skills_associated: Option<Vec<String>>,
    pub prerequisites: Option<Vec<PrerequisiteRef>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Course {
    /// Minimal course with a generated id and no optional data.
    pub fn new(
        course_id: impl Into<String>,
        course_name: impl Into<String>,
        major: impl Into<String>,
    ) -> Self {
        Self {
            id: CourseId::generate(),
            course_id: course_id.into(),
            course_name: course_name.into(),
            course_description: None,
            major: major.into(),
            domains: None,
            skills_associated: None,
            prerequisites: None,
            created_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.course_description = Some(description.into());
        self
    }

    pub fn with_prerequisites(mut self, prerequisites: Vec<PrerequisiteRef>) -> Self {
        self.prerequisites = Some(prerequisites);
        self
    }

    pub fn with_domains(mut self, domains: Vec<String>) -> Self {
        self.domains = Some(domains);
        self
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills_associated = Some(skills);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Declared prerequisites, empty when none are recorded.
    pub fn prerequisite_refs(&self) -> &[PrerequisiteRef] {
        self.prerequisites.as_deref().unwrap_or(&[])
    }

    /// Whether `key` identifies this course, either by code (any case) or by UUID.
    pub fn matches_key(&self, key: &str) -> bool {
        let key = key.trim();
        self.course_id.eq_ignore_ascii_case(key) || self.id.to_string().eq_ignore_ascii_case(key)
    }

    /// Normalise codes and majors to their canonical upper-case form and give
    /// unnamed prerequisites their code as display name.
    pub fn normalized(mut self) -> Self {
        self.course_id = normalize_code(&self.course_id);
        self.major = normalize_code(&self.major);
        if let Some(prereqs) = self.prerequisites.as_mut() {
            for prereq in prereqs.iter_mut() {
                prereq.course_id = normalize_code(&prereq.course_id);
                if prereq.name.trim().is_empty() {
                    prereq.name = prereq.course_id.clone();
                }
            }
        }
        self
    }
}
