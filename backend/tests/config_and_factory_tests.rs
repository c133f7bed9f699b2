//! Configuration loading, environment overrides and startup wiring.

mod support;

use std::io::Write;
use std::path::PathBuf;

use course_search::auth::{IdentityProvider, StaticTokenProvider};
use course_search::config::AppConfig;
use course_search::db::{self, RepositoryFactory, RepositoryType};
use course_search::graph::{self, GraphType, PrerequisiteGraph};
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const CONFIG_TOML: &str = r#"
[repository]
type = "local"

[graph]
type = "memory"

[[auth.users]]
token = "abc"
id = "student-7"
completed_courses = ["csye6200"]

[server]
host = "127.0.0.1"
port = 9090
"#;

#[test]
fn test_config_file_via_env_var() {
    let file = write_temp(CONFIG_TOML);
    let path = file.path().to_str().unwrap().to_string();

    let mut env = support::cleared_config_env();
    env.retain(|(k, _)| *k != "COURSE_SEARCH_CONFIG");
    env.push(("COURSE_SEARCH_CONFIG", Some(path.as_str())));

    let config = support::with_scoped_env(&env, AppConfig::load).unwrap();
    assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
    assert_eq!(config.graph_type().unwrap(), GraphType::Memory);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.auth.users.len(), 1);
}

#[test]
fn test_missing_explicit_config_file_is_an_error() {
    let mut env = support::cleared_config_env();
    env.retain(|(k, _)| *k != "COURSE_SEARCH_CONFIG");
    env.push(("COURSE_SEARCH_CONFIG", Some("/definitely/not/here.toml")));

    let result = support::with_scoped_env(&env, AppConfig::load);
    assert!(result.is_err());
}

#[test]
fn test_env_overrides_file_values() {
    let config = AppConfig::from_toml_str(CONFIG_TOML).unwrap();

    let mut env = support::cleared_config_env();
    env.retain(|(k, _)| !matches!(*k, "GRAPH_TYPE" | "PORT" | "COURSE_CATALOG_PATH" | "NEO4J_URI"));
    env.extend([
        ("GRAPH_TYPE", Some("neo4j")),
        ("NEO4J_URI", Some("127.0.0.1:7687")),
        ("PORT", Some("7000")),
        ("COURSE_CATALOG_PATH", Some("data/courses.json")),
    ]);

    let config = support::with_scoped_env(&env, || config.with_env_overrides());
    assert_eq!(config.graph_type().unwrap(), GraphType::Neo4j);
    assert_eq!(config.neo4j.uri, "127.0.0.1:7687");
    assert_eq!(config.server.port, 7000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.catalog.path, Some(PathBuf::from("data/courses.json")));
}

#[test]
fn test_database_url_selects_postgres() {
    let mut env = support::cleared_config_env();
    env.retain(|(k, _)| *k != "DATABASE_URL");
    env.push(("DATABASE_URL", Some("postgres://localhost/courses")));

    let config = support::with_scoped_env(&env, || AppConfig::default().with_env_overrides());
    assert_eq!(config.repository_type().unwrap(), RepositoryType::Postgres);
    assert_eq!(config.postgres.database_url, "postgres://localhost/courses");

    // an explicit type wins over the URL
    env.retain(|(k, _)| *k != "REPOSITORY_TYPE");
    env.push(("REPOSITORY_TYPE", Some("local")));
    let config = support::with_scoped_env(&env, || AppConfig::default().with_env_overrides());
    assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
}

#[tokio::test]
async fn test_unknown_repository_type_from_env_fails_startup() {
    let mut env = support::cleared_config_env();
    env.retain(|(k, _)| *k != "REPOSITORY_TYPE");
    env.push(("REPOSITORY_TYPE", Some("sqlite")));

    let config = support::with_scoped_env(&env, || AppConfig::default().with_env_overrides());
    assert!(config.repository_type().is_err());

    let err = RepositoryFactory::from_config(&config).await.err().unwrap();
    assert!(matches!(err, db::RepositoryError::ConfigurationError { .. }));
}

#[tokio::test]
async fn test_startup_wiring_from_catalog_file() {
    let catalog_file = write_temp(support::CATALOG_JSON);
    let config = AppConfig::from_toml_str(CONFIG_TOML).unwrap();

    let repository = RepositoryFactory::from_config(&config).await.unwrap();
    let courses = db::load_catalog(catalog_file.path()).unwrap();
    let stored = db::store_courses(repository.as_ref(), &courses).await.unwrap();
    assert_eq!(stored, 6);

    let graph = graph::create_graph(&config, &courses).await.unwrap();
    assert!(graph.is_configured());
    let status = graph
        .check_prerequisites_completion("CSYE6225", &["csye6200".to_string()])
        .await
        .unwrap();
    assert!(status.prerequisites_met);

    let identity = StaticTokenProvider::from_settings(&config.auth.users);
    let user = identity.resolve("abc").await.unwrap();
    assert_eq!(user.id, "student-7");
    assert_eq!(user.completed_courses, vec!["CSYE6200"]);

    let course = db::get_course_by_id(repository.as_ref(), "damg6210")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(course.course_name, "Data Management and Database Design");
}

#[test]
fn test_catalog_with_duplicates_is_rejected() {
    let file = write_temp(
        r#"[{"course_id": "CSYE6200", "course_name": "A", "major": "CSYE"},
            {"course_id": "CSYE6200", "course_name": "B", "major": "CSYE"}]"#,
    );
    let err = db::load_catalog(file.path()).unwrap_err();
    assert!(err.is_validation());
}
