//! Course storage.
//!
//! Callers go through [`services`], which validates input and shapes
//! results, on top of the [`CourseRepository`] trait. [`RepositoryFactory`]
//! picks the backend at startup: [`LocalRepository`] keeps the catalog in
//! memory, and `PostgresRepository` (feature `postgres-repo`) stores it with
//! Diesel. [`catalog`] reads the JSON seed file.
//!
//! ```ignore
//! let repo = RepositoryFactory::create_local();
//! store_courses(repo.as_ref(), &load_catalog("data/courses.json")?).await?;
//! let page = search_courses(repo.as_ref(), "cloud", 5, 0, None).await?;
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod catalog;
pub mod factory;
pub mod repositories;
pub mod repository;
pub mod services;


#[cfg(feature = "postgres-repo")]
pub use repositories::{PostgresConfig, PostgresRepository};

pub use catalog::{load_catalog, parse_catalog};
pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
pub use repository::{
    CoursePage, CourseQuery, CourseRepository, ErrorContext, RepositoryError, RepositoryResult,
    ScoredCourse,
};
pub use services::{get_course_by_id, get_courses_by_major, health_check, search_courses, store_courses};
