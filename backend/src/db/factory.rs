//! Picks and builds the course store at startup.

use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{CourseRepository, RepositoryError, RepositoryResult};
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Diesel on PostgreSQL; needs the `postgres-repo` feature.
    Postgres,
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" | "memory" => Ok(Self::Local),
            other => Err(format!("Unknown repository type: {other}")),
        }
    }
}

pub struct RepositoryFactory;

impl RepositoryFactory {
    /// An empty in-memory store.
    pub fn create_local() -> Arc<dyn CourseRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Builds the store described by the `[repository]` and `[postgres]` sections,
    /// after environment overrides have been applied to `config`.
    pub async fn from_config(config: &AppConfig) -> RepositoryResult<Arc<dyn CourseRepository>> {
        let repo_type = config
            .repository_type()
            .map_err(|e| RepositoryError::configuration(format!("Invalid repository type: {e}")))?;
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Postgres => open_postgres(config).await,
        }
    }
}

#[cfg(feature = "postgres-repo")]
async fn open_postgres(config: &AppConfig) -> RepositoryResult<Arc<dyn CourseRepository>> {
    use super::repositories::PostgresRepository;

    let settings = config.to_postgres_config()?.ok_or_else(|| {
        RepositoryError::configuration("Postgres repository requires database configuration")
    })?;

    // pool setup and migrations block
    let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(settings))
        .await
        .map_err(|e| RepositoryError::internal(format!("Blocking task failed: {e}")))??;
    Ok(Arc::new(repo))
}

#[cfg(not(feature = "postgres-repo"))]
async fn open_postgres(_config: &AppConfig) -> RepositoryResult<Arc<dyn CourseRepository>> {
    Err(RepositoryError::configuration(
        "Postgres repository feature not enabled",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_parsing() {
        assert_eq!("postgres".parse::<RepositoryType>().unwrap(), RepositoryType::Postgres);
        assert_eq!("PG".parse::<RepositoryType>().unwrap(), RepositoryType::Postgres);
        assert_eq!(" Local ".parse::<RepositoryType>().unwrap(), RepositoryType::Local);
        assert!("sqlite".parse::<RepositoryType>().is_err());
    }

    #[tokio::test]
    async fn test_create_local() {
        let repo = RepositoryFactory::create_local();
        assert!(repo.health_check().await.unwrap());
    }

    #[cfg(not(feature = "postgres-repo"))]
    #[tokio::test]
    async fn test_postgres_without_feature_is_configuration_error() {
        let mut config = AppConfig::default();
        config.repository.repo_type = "postgres".to_string();
        let result = RepositoryFactory::from_config(&config).await;
        assert!(matches!(
            result,
            Err(RepositoryError::ConfigurationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_from_config_rejects_unknown_type() {
        let mut config = AppConfig::default();
        config.repository.repo_type = "sqlite".to_string();
        let err = RepositoryFactory::from_config(&config).await.err().unwrap();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
        assert!(err.to_string().contains("Unknown repository type: sqlite"));
    }

    #[tokio::test]
    async fn test_from_config_defaults_to_local() {
        let repo = RepositoryFactory::from_config(&AppConfig::default())
            .await
            .unwrap();
        assert!(repo.health_check().await.unwrap());
    }
}
