//! HTTP server module.
//!
//! An axum server exposing course search as a REST API on top of the
//! service layer, repositories and route DTOs from the core library.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Bearer authentication (RequestContext)                 │
//! │  - Query parameter validation                             │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services::CourseQueryHandler)             │
//! │  - Search, lookup, listing                                │
//! │  - Eligibility partition                                  │
//! └─────────┬───────────────────────────────┬────────────────┘
//!           │                               │
//! ┌─────────▼──────────────┐   ┌────────────▼───────────────┐
//! │  Repository (db/)      │   │  Prerequisite graph        │
//! └────────────────────────┘   └────────────────────────────┘
//! ```

pub mod context;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use context::RequestContext;
pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
