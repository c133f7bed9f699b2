use serde::{Deserialize, Serialize};

use super::course::CourseRecord;
use crate::models::Major;

/// Courses belonging to one major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorCoursesResponse {
    pub major: Major,
    pub courses: Vec<CourseRecord>,
    pub total_count: usize,
    pub limit: usize,
}

impl MajorCoursesResponse {
    pub fn new(major: Major, courses: Vec<CourseRecord>, limit: usize) -> Self {
        Self {
            major,
            total_count: courses.len(),
            courses,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_count_matches_courses() {
        let response = MajorCoursesResponse::new(Major::Damg, vec![], 50);
        assert_eq!(response.total_count, 0);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["major"], "DAMG");
        assert_eq!(value["limit"], 50);
    }
}
