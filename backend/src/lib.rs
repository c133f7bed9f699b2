//! # Course Search Backend
//!
//! Course search and retrieval over a course catalog, with optional
//! eligibility checks against a prerequisite graph.
//!
//! ## Features
//!
//! - **Search**: tiered text matching over course codes, names and descriptions
//! - **Eligibility**: split search hits into courses the caller may take and
//!   courses still blocked by prerequisites
//! - **Lookup**: fetch a course by code or UUID, or list a major's courses
//! - **HTTP API**: authenticated REST endpoints built on axum
//!
//! ## Architecture
//!
//! - [`api`]: Public DTO re-exports
//! - [`auth`]: Bearer token identities
//! - [`config`]: TOML and environment configuration
//! - [`db`]: Repository pattern, catalog loading and storage backends
//! - [`graph`]: Prerequisite graph backends
//! - [`services`]: Course queries and the eligibility partition
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`routes`]: Response types for each endpoint

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod graph;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
