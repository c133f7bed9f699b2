//! Public API surface for the course search backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::graph::PrerequisiteStatus;
pub use crate::models::{Course, CourseId, InvalidMajor, Major, PrerequisiteRef, VALID_MAJORS};
pub use crate::routes::course::CourseRecord;
pub use crate::routes::major::MajorCoursesResponse;
pub use crate::routes::search::AnnotatedCourse;
pub use crate::routes::search::SearchHit;
pub use crate::routes::search::SearchMetadata;
pub use crate::routes::search::SearchResponse;
pub use crate::routes::search::SearchResults;
