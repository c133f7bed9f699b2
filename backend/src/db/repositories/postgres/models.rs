use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double};
use serde_json::Value;
use uuid::Uuid;

use super::schema::courses;
use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{Course, CourseId, PrerequisiteRef};

#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseRow {
    pub id: Uuid,
    pub course_id: String,
    pub course_name: String,
    pub course_description: Option<String>,
    pub major: String,
    pub domains: Option<Vec<String>>,
    pub skills_associated: Option<Vec<String>>,
    pub prerequisites: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CourseRow {
    pub fn into_course(self) -> RepositoryResult<Course> {
        let prerequisites = match self.prerequisites {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value::<Vec<PrerequisiteRef>>(value).map_err(|e| {
                    RepositoryError::internal(format!(
                        "Failed to parse prerequisites of {}: {e}",
                        self.course_id
                    ))
                })?,
            ),
        };

        Ok(Course {
            id: CourseId::new(self.id),
            course_id: self.course_id,
            course_name: self.course_name,
            course_description: self.course_description,
            major: self.major,
            domains: self.domains,
            skills_associated: self.skills_associated,
            prerequisites,
            created_at: self.created_at,
        })
    }
}

/// Course row joined with its computed match score.
#[derive(Debug, Clone, QueryableByName)]
pub struct ScoredCourseRow {
    #[diesel(embed)]
    pub course: CourseRow,
    #[diesel(sql_type = Double)]
    pub relevance_score: f64,
}

#[derive(Debug, Clone, QueryableByName)]
pub struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub struct NewCourseRow {
    pub id: Uuid,
    pub course_id: String,
    pub course_name: String,
    pub course_description: Option<String>,
    pub major: String,
    pub domains: Option<Vec<String>>,
    pub skills_associated: Option<Vec<String>>,
    pub prerequisites: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewCourseRow {
    pub fn from_course(course: &Course) -> RepositoryResult<Self> {
        let course = course.clone().normalized();
        let prerequisites = course
            .prerequisites
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| RepositoryError::internal(format!("Failed to encode prerequisites: {e}")))?;

        Ok(Self {
            id: course.id.value(),
            course_id: course.course_id,
            course_name: course.course_name,
            course_description: course.course_description,
            major: course.major,
            domains: course.domains,
            skills_associated: course.skills_associated,
            prerequisites,
            created_at: Some(course.created_at.unwrap_or_else(Utc::now)),
        })
    }
}
