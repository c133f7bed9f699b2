//! Service layer for course queries.
//!
//! Services sit between the HTTP handlers and the repository/graph
//! collaborators: they validate user input, orchestrate collaborator calls and
//! classify failures into [`QueryError`].

pub mod course_query;
pub mod error;

pub use course_query::{
    partition_by_eligibility, CourseQueryHandler, SearchRequest, DEFAULT_MAJOR_LIMIT,
    DEFAULT_SEARCH_LIMIT, MAX_MAJOR_LIMIT,
};
pub use error::QueryError;
