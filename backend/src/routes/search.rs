use serde::{Deserialize, Serialize};

use super::course::CourseRecord;
use crate::graph::PrerequisiteStatus;
use crate::models::PrerequisiteRef;

/// One course returned by the search collaborator, with its match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub course: CourseRecord,
    /// Match quality in `[0, 1]`, higher is better
    pub relevance_score: f64,
}

/// Echo of the parameters a search ran with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMetadata {
    pub query: String,
    pub limit: usize,
    pub offset: usize,
    pub major_filter: Option<String>,
    pub returned_count: usize,
}

/// Raw page of search hits as produced by the search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub courses: Vec<SearchHit>,
    /// Number of matches before pagination
    pub total_count: usize,
    pub has_more: bool,
    pub search_metadata: SearchMetadata,
}

/// A search hit, optionally annotated with the caller's eligibility.
///
/// Without a prerequisite check every annotation is absent and the value
/// serializes exactly like the underlying [`SearchHit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedCourse {
    #[serde(flatten)]
    pub hit: SearchHit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisite_status: Option<PrerequisiteStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_prerequisites: Option<Vec<PrerequisiteRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisite_message: Option<String>,
}

impl AnnotatedCourse {
    /// Hit passed through untouched.
    pub fn plain(hit: SearchHit) -> Self {
        Self {
            hit,
            prerequisite_status: None,
            eligible: None,
            missing_prerequisites: None,
            prerequisite_message: None,
        }
    }

    /// Hit the caller may take.
    pub fn eligible(hit: SearchHit, status: PrerequisiteStatus) -> Self {
        Self {
            hit,
            prerequisite_status: Some(status),
            eligible: Some(true),
            missing_prerequisites: None,
            prerequisite_message: None,
        }
    }

    /// Hit blocked by prerequisites the caller has not completed.
    pub fn ineligible(hit: SearchHit, status: PrerequisiteStatus) -> Self {
        let missing = status.missing_prerequisites.clone();
        let message = prerequisite_message(&missing);
        Self {
            hit,
            prerequisite_status: Some(status),
            eligible: Some(false),
            missing_prerequisites: Some(missing),
            prerequisite_message: Some(message),
        }
    }

    pub fn course_id(&self) -> &str {
        &self.hit.course.course_id
    }
}

/// Human-readable hint listing the prerequisites a caller could complete.
pub fn prerequisite_message(missing: &[PrerequisiteRef]) -> String {
    let names: Vec<&str> = missing.iter().map(|p| p.name.as_str()).collect();
    format!("Complete one of: {}", names.join(", "))
}

/// Search results split by eligibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub results: SearchResults,
    pub eligible_courses: Vec<AnnotatedCourse>,
    pub ineligible_courses: Vec<AnnotatedCourse>,
    pub prerequisites_checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_completed_courses: Option<Vec<String>>,
    pub eligible_count: usize,
    pub ineligible_count: usize,
}

impl SearchResponse {
    /// Response when no prerequisite check ran: every hit is listed as eligible.
    pub fn unchecked(results: SearchResults) -> Self {
        let eligible_courses: Vec<AnnotatedCourse> = results
            .courses
            .iter()
            .cloned()
            .map(AnnotatedCourse::plain)
            .collect();
        Self {
            eligible_count: eligible_courses.len(),
            eligible_courses,
            ineligible_courses: Vec::new(),
            prerequisites_checked: false,
            user_completed_courses: None,
            ineligible_count: 0,
            results,
        }
    }

    /// Response carrying a completed eligibility partition.
    pub fn checked(
        results: SearchResults,
        eligible_courses: Vec<AnnotatedCourse>,
        ineligible_courses: Vec<AnnotatedCourse>,
        completed_courses: Vec<String>,
    ) -> Self {
        Self {
            eligible_count: eligible_courses.len(),
            ineligible_count: ineligible_courses.len(),
            eligible_courses,
            ineligible_courses,
            prerequisites_checked: true,
            user_completed_courses: Some(completed_courses),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;

    fn hit(code: &str) -> SearchHit {
        SearchHit {
            course: CourseRecord::from(Course::new(code, format!("{code} name"), "CSYE")),
            relevance_score: 0.9,
        }
    }

    fn results(codes: &[&str]) -> SearchResults {
        let courses: Vec<SearchHit> = codes.iter().map(|c| hit(c)).collect();
        SearchResults {
            total_count: courses.len(),
            has_more: false,
            search_metadata: SearchMetadata {
                query: "CSYE".to_string(),
                limit: 5,
                offset: 0,
                major_filter: None,
                returned_count: courses.len(),
            },
            courses,
        }
    }

    #[test]
    fn test_prerequisite_message_joins_names() {
        let missing = vec![
            PrerequisiteRef::code("CSYE6200"),
            PrerequisiteRef::new("INFO5100", "Application Engineering"),
        ];
        assert_eq!(
            prerequisite_message(&missing),
            "Complete one of: CSYE6200, Application Engineering"
        );
    }

    #[test]
    fn test_unchecked_lists_everything_as_eligible() {
        let response = SearchResponse::unchecked(results(&["CSYE6200", "CSYE6225"]));
        assert_eq!(response.eligible_count, 2);
        assert_eq!(response.ineligible_count, 0);
        assert!(!response.prerequisites_checked);
        assert_eq!(response.eligible_courses[0].course_id(), "CSYE6200");
        assert_eq!(response.eligible_courses[1].course_id(), "CSYE6225");
    }

    #[test]
    fn test_plain_course_serializes_like_hit() {
        let h = hit("CSYE6200");
        let plain = serde_json::to_value(AnnotatedCourse::plain(h.clone())).unwrap();
        assert_eq!(plain, serde_json::to_value(&h).unwrap());
        assert!(plain.get("eligible").is_none());
    }

    #[test]
    fn test_ineligible_annotations() {
        let status = PrerequisiteStatus::unmet(vec![PrerequisiteRef::code("CSYE6200")]);
        let course = AnnotatedCourse::ineligible(hit("CSYE6225"), status);
        let value = serde_json::to_value(&course).unwrap();
        assert_eq!(value["eligible"], false);
        assert_eq!(value["prerequisite_message"], "Complete one of: CSYE6200");
        assert_eq!(value["missing_prerequisites"][0]["course_id"], "CSYE6200");
        assert_eq!(value["prerequisite_status"]["prerequisites_met"], false);
        assert_eq!(value["course_id"], "CSYE6225");
    }

    #[test]
    fn test_response_flattens_search_results() {
        let response = SearchResponse::checked(results(&["CSYE6200"]), vec![], vec![], vec![]);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["total_count"], 1);
        assert_eq!(value["has_more"], false);
        assert_eq!(value["search_metadata"]["query"], "CSYE");
        assert_eq!(value["prerequisites_checked"], true);
        assert!(value["user_completed_courses"].as_array().unwrap().is_empty());
    }
}
