//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies for the course endpoints live in [`crate::routes`]; this
//! module holds query-string parameters and the health payload.

use serde::{Deserialize, Serialize};

use crate::db::services::{MAX_QUERY_CHARS, MAX_SEARCH_LIMIT};
use crate::services::{SearchRequest, DEFAULT_MAJOR_LIMIT, DEFAULT_SEARCH_LIMIT, MAX_MAJOR_LIMIT};

/// Query parameters for `GET /v1/courses/search`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchParams {
    /// Search text (required, 1 to 200 characters)
    #[serde(default)]
    pub q: Option<String>,
    /// Page size, 1 to 100 (default: 5)
    #[serde(default)]
    pub limit: Option<i64>,
    /// Results to skip (default: 0)
    #[serde(default)]
    pub offset: Option<i64>,
    /// Restrict to one major
    #[serde(default)]
    pub major: Option<String>,
    /// Split results by eligibility (default: true)
    #[serde(default)]
    pub check_prerequisites: Option<bool>,
}

impl SearchParams {
    /// Validate the parameters and apply defaults.
    pub fn into_request(self) -> Result<SearchRequest, String> {
        let query = self.q.unwrap_or_default();
        let length = query.chars().count();
        if length == 0 {
            return Err("q is required".to_string());
        }
        if length > MAX_QUERY_CHARS {
            return Err(format!("q must be at most {MAX_QUERY_CHARS} characters"));
        }

        let limit = self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT as i64);
        if !(1..=MAX_SEARCH_LIMIT as i64).contains(&limit) {
            return Err(format!("limit must be between 1 and {MAX_SEARCH_LIMIT}"));
        }
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err("offset must be greater than or equal to 0".to_string());
        }

        Ok(SearchRequest {
            query,
            limit: limit as usize,
            offset: offset as usize,
            major: self.major,
            check_prerequisites: self.check_prerequisites.unwrap_or(true),
        })
    }
}

/// Query parameters for `GET /v1/courses/major/{major}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MajorParams {
    /// Page size, 1 to 200 (default: 50)
    #[serde(default)]
    pub limit: Option<i64>,
}

impl MajorParams {
    pub fn limit(&self) -> Result<usize, String> {
        let limit = self.limit.unwrap_or(DEFAULT_MAJOR_LIMIT as i64);
        if !(1..=MAX_MAJOR_LIMIT as i64).contains(&limit) {
            return Err(format!("limit must be between 1 and {MAX_MAJOR_LIMIT}"));
        }
        Ok(limit as usize)
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
    /// Prerequisite graph status
    pub graph: String,
}
