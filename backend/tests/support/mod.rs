#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use course_search::auth::{CurrentUser, StaticTokenProvider};
use course_search::db::{
    parse_catalog, CoursePage, CourseQuery, CourseRepository, LocalRepository, RepositoryError,
    RepositoryResult,
};
use course_search::graph::{
    GraphError, InMemoryPrerequisiteGraph, PrerequisiteGraph, PrerequisiteStatus, UnconfiguredGraph,
};
use course_search::models::{Course, Major};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to the process
/// environment so parallel tests do not race.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Environment variables read by `AppConfig::with_env_overrides`, all unset.
pub const CONFIG_ENV_KEYS: &[&str] = &[
    "COURSE_SEARCH_CONFIG",
    "REPOSITORY_TYPE",
    "DATABASE_URL",
    "PG_DATABASE_URL",
    "PG_POOL_MAX",
    "GRAPH_TYPE",
    "NEO4J_URI",
    "NEO4J_USER",
    "NEO4J_PASSWORD",
    "COURSE_CATALOG_PATH",
    "HOST",
    "PORT",
];

pub fn cleared_config_env<'a>() -> Vec<(&'a str, Option<&'a str>)> {
    CONFIG_ENV_KEYS.iter().map(|k| (*k, None)).collect()
}

pub const CATALOG_JSON: &str = r#"[
  {
    "course_id": "CSYE6200",
    "course_name": "Concepts of Object Oriented Design",
    "course_description": "Object oriented design and programming in Java",
    "major": "CSYE",
    "domains": ["Software Engineering"],
    "skills_associated": ["Java", "OOP"],
    "created_at": "2024-01-10T08:00:00Z"
  },
  {
    "course_id": "CSYE6225",
    "course_name": "Network Structures and Cloud Computing",
    "course_description": "Building and deploying cloud native applications",
    "major": "CSYE",
    "domains": ["Cloud"],
    "skills_associated": ["AWS", "Terraform"],
    "prerequisites": [{"course_id": "CSYE6200", "name": "CSYE6200"}]
  },
  {
    "course_id": "CSYE7200",
    "course_name": "Big Data Systems Engineering Using Scala",
    "major": "CSYE",
    "prerequisites": ["CSYE6200", {"course_id": "INFO6205", "name": "Program Structure and Algorithms"}]
  },
  {
    "course_id": "INFO6150",
    "course_name": "Web Design and User Experience Engineering",
    "course_description": "Front-end engineering for the web",
    "major": "INFO"
  },
  {
    "course_id": "INFO6205",
    "course_name": "Program Structure and Algorithms",
    "major": "INFO"
  },
  {
    "course_id": "DAMG6210",
    "course_name": "Data Management and Database Design",
    "course_description": "Relational database design and SQL",
    "major": "DAMG"
  }
]"#;

pub const FRESH_TOKEN: &str = "token-fresh";
pub const OOD_TOKEN: &str = "token-ood";

pub fn catalog() -> Vec<Course> {
    parse_catalog(CATALOG_JSON).expect("fixture catalog parses")
}

pub fn repository() -> Arc<LocalRepository> {
    Arc::new(LocalRepository::with_courses(catalog()))
}

pub fn memory_graph() -> Arc<dyn PrerequisiteGraph> {
    Arc::new(InMemoryPrerequisiteGraph::from_courses(&catalog()))
}

pub fn unconfigured_graph() -> Arc<dyn PrerequisiteGraph> {
    Arc::new(UnconfiguredGraph)
}

/// Two users: one with nothing completed and one who finished CSYE6200.
pub fn identities() -> Arc<StaticTokenProvider> {
    Arc::new(
        StaticTokenProvider::new()
            .with_user(FRESH_TOKEN, CurrentUser::new("student-fresh", vec![]))
            .with_user(
                OOD_TOKEN,
                CurrentUser::new("student-ood", vec!["CSYE6200".to_string()]),
            ),
    )
}

/// Text carried by every injected failure; must never reach a response body.
pub const BACKEND_FAILURE: &str = "relation \"courses\" does not exist at 10.0.0.7";

/// Repository whose every call fails with a query error.
pub struct FailingRepository;

#[async_trait]
impl CourseRepository for FailingRepository {
    async fn search_courses(&self, _query: &CourseQuery) -> RepositoryResult<CoursePage> {
        Err(RepositoryError::query(BACKEND_FAILURE))
    }

    async fn get_course(&self, _key: &str) -> RepositoryResult<Option<Course>> {
        Err(RepositoryError::query(BACKEND_FAILURE))
    }

    async fn list_courses_by_major(
        &self,
        _major: Major,
        _limit: usize,
    ) -> RepositoryResult<Vec<Course>> {
        Err(RepositoryError::query(BACKEND_FAILURE))
    }

    async fn store_courses(&self, _courses: &[Course]) -> RepositoryResult<usize> {
        Err(RepositoryError::query(BACKEND_FAILURE))
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Err(RepositoryError::connection(BACKEND_FAILURE))
    }
}

/// Graph that answers the first `healthy_calls` checks from the fixture
/// catalog and fails every check after that.
pub struct FlakyGraph {
    inner: InMemoryPrerequisiteGraph,
    healthy_calls: usize,
    calls: AtomicUsize,
}

impl FlakyGraph {
    pub fn failing_after(healthy_calls: usize) -> Self {
        Self {
            inner: InMemoryPrerequisiteGraph::from_courses(&catalog()),
            healthy_calls,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrerequisiteGraph for FlakyGraph {
    fn is_configured(&self) -> bool {
        true
    }

    async fn check_prerequisites_completion(
        &self,
        course_id: &str,
        completed: &[String],
    ) -> Result<PrerequisiteStatus, GraphError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.healthy_calls {
            self.inner
                .check_prerequisites_completion(course_id, completed)
                .await
        } else {
            Err(GraphError::Query(BACKEND_FAILURE.to_string()))
        }
    }
}
