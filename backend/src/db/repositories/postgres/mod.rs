//! Course storage in PostgreSQL through Diesel.
//!
//! Connections come from an r2d2 pool. Every query runs on the blocking
//! thread pool and is repeated with doubling back-off while it keeps failing
//! with a retryable error. Embedded migrations create the `courses` table
//! when the repository is built.
//!
//! Settings come from the `[postgres]` config section (see
//! [`crate::config::AppConfig::to_postgres_config`]), where `DATABASE_URL` and
//! the `PG_*` variables override the file values.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Nullable, Text};
use diesel::upsert::excluded;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, warn};
use std::time::Duration;

use crate::db::repository::{
    CoursePage, CourseQuery, CourseRepository, ErrorContext, RepositoryError, RepositoryResult,
    ScoredCourse,
};
use crate::models::{Course, CourseId, Major};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Rows inserted per statement when seeding the catalog.
const INSERT_CHUNK_SIZE: usize = 500;

/// Scores mirror the tiers used by the in-memory repository.
const SCORED_MATCHES_SQL: &str = "
    SELECT * FROM (
        SELECT c.*,
            CASE
                WHEN lower(c.course_id) = lower($1) THEN 1.0
                WHEN c.course_id ILIKE $2 THEN 0.9
                WHEN c.course_name ILIKE $2 THEN 0.7
                WHEN c.course_description ILIKE $2 THEN 0.5
                ELSE 0.0
            END::float8 AS relevance_score
        FROM courses c
        WHERE ($3::text IS NULL OR upper(c.major) = $3)
    ) scored
    WHERE relevance_score > 0";

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
    /// Extra attempts after the first one fails with a retryable error.
    pub max_retries: u32,
    /// Pause before the first retry; doubled for each one after.
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    fn retry_delay(&self, retry: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(1 << retry.min(16)))
    }
}

#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Opens the pool and applies pending migrations. Blocks; call from `spawn_blocking`.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(ConnectionManager::<PgConnection>::new(&config.database_url))
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("open_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        let mut conn = pool
            .get()
            .map_err(|e| RepositoryError::from(e).with_operation("migrate"))?;
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {e}"),
                ErrorContext::new("migrate").with_entity("courses"),
            )
        })?;
        drop(conn);

        Ok(Self { pool, config })
    }

    /// Runs `f` against a pooled connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || {
            let mut retry = 0;
            loop {
                let outcome = pool
                    .get()
                    .map_err(|e| {
                        RepositoryError::from(e).with_operation(format!("checkout#{}", retry + 1))
                    })
                    .and_then(|mut conn| f.clone()(&mut conn));

                match outcome {
                    Err(err) if err.is_retryable() && retry < config.max_retries => {
                        let delay = config.retry_delay(retry);
                        warn!("postgres attempt {} failed, retrying in {:?}: {}", retry + 1, delay, err);
                        std::thread::sleep(delay);
                        retry += 1;
                    }
                    other => return other,
                }
            }
        })
        .await
        .map_err(|e| RepositoryError::internal(format!("Blocking task failed: {e}")))?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// `%text%` with LIKE wildcards in `text` escaped.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl CourseRepository for PostgresRepository {
    async fn search_courses(&self, query: &CourseQuery) -> RepositoryResult<CoursePage> {
        let text = query.text.trim().to_string();
        if text.is_empty() {
            return Err(RepositoryError::validation_with_context(
                "Search query cannot be empty",
                ErrorContext::new("search_courses").with_entity("course"),
            ));
        }
        let pattern = like_pattern(&text);
        let major = query.major.map(|m| m.as_str().to_string());
        let limit = query.limit as i64;
        let offset = query.offset as i64;

        let (rows, total) = self
            .with_conn(move |conn| {
                let total = sql_query(format!(
                    "SELECT COUNT(*) AS total FROM ({SCORED_MATCHES_SQL}) matches"
                ))
                .bind::<Text, _>(text.clone())
                .bind::<Text, _>(pattern.clone())
                .bind::<Nullable<Text>, _>(major.clone())
                .get_result::<CountRow>(conn)
                .map_err(map_diesel_error)?
                .total;

                let rows = sql_query(format!(
                    "{SCORED_MATCHES_SQL} ORDER BY relevance_score DESC, course_id ASC LIMIT $4 OFFSET $5"
                ))
                .bind::<Text, _>(text)
                .bind::<Text, _>(pattern)
                .bind::<Nullable<Text>, _>(major)
                .bind::<BigInt, _>(limit)
                .bind::<BigInt, _>(offset)
                .load::<ScoredCourseRow>(conn)
                .map_err(map_diesel_error)?;

                Ok((rows, total))
            })
            .await
            .map_err(|e| e.with_operation("search_courses"))?;

        let hits = rows
            .into_iter()
            .map(|row| {
                Ok(ScoredCourse {
                    relevance_score: row.relevance_score,
                    course: row.course.into_course()?,
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;
        debug!("postgres search '{}' matched {} courses", query.text, total);

        Ok(CoursePage {
            hits,
            total_count: total.max(0) as usize,
        })
    }

    async fn get_course(&self, key: &str) -> RepositoryResult<Option<Course>> {
        let key = key.trim().to_string();
        let by_uuid = key.parse::<CourseId>().ok();

        let row = self
            .with_conn(move |conn| {
                if let Some(id) = by_uuid {
                    return courses::table
                        .find(id.value())
                        .select(CourseRow::as_select())
                        .first::<CourseRow>(conn)
                        .optional()
                        .map_err(map_diesel_error);
                }
                sql_query("SELECT * FROM courses WHERE lower(course_id) = lower($1) LIMIT 1")
                    .bind::<Text, _>(key)
                    .get_result::<CourseRow>(conn)
                    .optional()
                    .map_err(map_diesel_error)
            })
            .await
            .map_err(|e| e.with_operation("get_course"))?;

        row.map(CourseRow::into_course).transpose()
    }

    async fn list_courses_by_major(
        &self,
        major: Major,
        limit: usize,
    ) -> RepositoryResult<Vec<Course>> {
        let limit = limit as i64;
        let rows = self
            .with_conn(move |conn| {
                courses::table
                    .filter(courses::major.eq(major.as_str()))
                    .order(courses::course_id.asc())
                    .limit(limit)
                    .select(CourseRow::as_select())
                    .load::<CourseRow>(conn)
                    .map_err(map_diesel_error)
            })
            .await
            .map_err(|e| e.with_operation("list_courses_by_major"))?;

        rows.into_iter().map(CourseRow::into_course).collect()
    }

    async fn store_courses(&self, courses_in: &[Course]) -> RepositoryResult<usize> {
        let rows = courses_in
            .iter()
            .map(NewCourseRow::from_course)
            .collect::<RepositoryResult<Vec<_>>>()?;

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let mut written = 0;
                for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
                    written += diesel::insert_into(courses::table)
                        .values(chunk)
                        .on_conflict(courses::course_id)
                        .do_update()
                        .set((
                            courses::course_name.eq(excluded(courses::course_name)),
                            courses::course_description.eq(excluded(courses::course_description)),
                            courses::major.eq(excluded(courses::major)),
                            courses::domains.eq(excluded(courses::domains)),
                            courses::skills_associated.eq(excluded(courses::skills_associated)),
                            courses::prerequisites.eq(excluded(courses::prerequisites)),
                        ))
                        .execute(tx)
                        .map_err(map_diesel_error)?;
                }
                Ok(written)
            })
        })
        .await
        .map_err(|e| e.with_operation("store_courses"))
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }
}
