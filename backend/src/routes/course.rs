use serde::{Deserialize, Serialize};

use crate::models::{Course, PrerequisiteRef};

/// JSON rendering of a single course.
///
/// Optional collections are rendered as empty lists and `created_at` as an
/// ISO-8601 string (or `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: String,
    pub course_id: String,
    pub course_name: String,
    pub course_description: Option<String>,
    pub major: String,
    pub domains: Vec<String>,
    pub skills_associated: Vec<String>,
    pub prerequisites: Vec<PrerequisiteRef>,
    pub created_at: Option<String>,
}

impl From<&Course> for CourseRecord {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.to_string(),
            course_id: course.course_id.clone(),
            course_name: course.course_name.clone(),
            course_description: course.course_description.clone(),
            major: course.major.clone(),
            domains: course.domains.clone().unwrap_or_default(),
            skills_associated: course.skills_associated.clone().unwrap_or_default(),
            prerequisites: course.prerequisites.clone().unwrap_or_default(),
            created_at: course.created_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

impl From<Course> for CourseRecord {
    fn from(course: Course) -> Self {
        CourseRecord::from(&course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_missing_collections_render_empty() {
        let course = Course::new("INFO6105", "Data Science Engineering", "INFO");
        let record = CourseRecord::from(&course);
        assert_eq!(record.id, course.id.to_string());
        assert!(record.domains.is_empty());
        assert!(record.skills_associated.is_empty());
        assert!(record.prerequisites.is_empty());
        assert_eq!(record.created_at, None);
    }

    #[test]
    fn test_created_at_is_iso_8601() {
        let created = Utc.with_ymd_and_hms(2024, 9, 1, 12, 30, 0).unwrap();
        let course = Course::new("DAMG6210", "Database Management", "DAMG").with_created_at(created);
        let record = CourseRecord::from(course);
        assert_eq!(record.created_at.as_deref(), Some("2024-09-01T12:30:00+00:00"));
    }

    #[test]
    fn test_serialized_shape() {
        let course = Course::new("CSYE6225", "Network Structures", "CSYE")
            .with_prerequisites(vec![PrerequisiteRef::code("CSYE6200")]);
        let value = serde_json::to_value(CourseRecord::from(&course)).unwrap();
        assert_eq!(value["course_id"], "CSYE6225");
        assert_eq!(value["prerequisites"][0]["name"], "CSYE6200");
        assert!(value["created_at"].is_null());
        assert!(value["course_description"].is_null());
    }
}
