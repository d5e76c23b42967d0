//! Database layer for the event API.
//!
//! This module provides:
//! - Connection pool management
//! - The [`EventRepository`] contract and its Postgres implementation
//! - Per-operation query metrics
//!
//! The database layer uses SQLx with Postgres.

mod error;
mod events;
mod query_metrics;

pub use error::{DbError, RepositoryError};
pub use events::PgEventRepository;
pub use query_metrics::DbMetrics;

use anyhow::{Context, Result};
use async_trait::async_trait;
use evtbook_events::{Event, NewEvent};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// Persistence boundary for events.
///
/// Implementations never log; failures come back as [`RepositoryError`]
/// and the caller decides what to report.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Store a new event and return it with its store-assigned `id` and `created_at`.
    async fn save_event(&self, event: &NewEvent) -> Result<Event, RepositoryError>;

    /// Fetch a single event by id.
    async fn get_event_by_id(&self, id: &str) -> Result<Event, RepositoryError>;
}

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL.
    pub database_url: String,

    /// Maximum number of connections in the pool.
    pub max_connections: u32,

    /// Minimum number of idle connections.
    pub min_connections: u32,

    /// Connection acquire timeout.
    pub acquire_timeout: Duration,

    /// Idle connection timeout.
    pub idle_timeout: Duration,

    /// Maximum lifetime of a connection.
    pub max_lifetime: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/evtbook".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl DbConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// `DATABASE_URL` wins when set. Otherwise the URL is assembled from
    /// `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT` and `DB_NAME`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None if lookup("DB_NAME").is_some() || lookup("DB_USER").is_some() => {
                database_url_from_parts(
                    lookup("DB_USER").as_deref(),
                    lookup("DB_PASSWORD").as_deref(),
                    lookup("DB_HOST").as_deref().unwrap_or("localhost"),
                    lookup("DB_PORT").as_deref().unwrap_or("5432"),
                    lookup("DB_NAME").as_deref().unwrap_or("evtbook"),
                )
            }
            None => defaults.database_url.clone(),
        };

        let max_connections: u32 = lookup("DB_MAX_CONNECTIONS")
            .map(|v| v.parse())
            .transpose()
            .context("DB_MAX_CONNECTIONS must be a positive integer.")?
            .unwrap_or(defaults.max_connections);

        let min_connections: u32 = lookup("DB_MIN_CONNECTIONS")
            .map(|v| v.parse())
            .transpose()
            .context("DB_MIN_CONNECTIONS must be a positive integer.")?
            .unwrap_or(defaults.min_connections);

        Ok(Self {
            database_url,
            max_connections,
            min_connections,
            ..defaults
        })
    }
}

/// Assemble a Postgres connection URL from its parts.
pub fn database_url_from_parts(
    user: Option<&str>,
    password: Option<&str>,
    host: &str,
    port: &str,
    name: &str,
) -> String {
    let credentials = match (user, password) {
        (Some(user), Some(password)) => format!("{user}:{password}@"),
        (Some(user), None) => format!("{user}@"),
        _ => String::new(),
    };
    format!("postgres://{credentials}{host}:{port}/{name}")
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .max_lifetime(Some(config.max_lifetime))
            .connect(&config.database_url)
            .await
            .map_err(DbError::Connect)?;

        info!("Database connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the database is reachable.
    pub async fn health_check(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(DbError::Query)?;
        Ok(())
    }

    /// Run pending migrations.
    ///
    /// Note: In production, migrations should be run via a separate migration tool
    /// or as part of deployment. This method uses runtime migration loading.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        info!("Running database migrations");

        let candidates = vec![
            std::path::PathBuf::from("./migrations"),
            std::path::PathBuf::from("services/api/migrations"),
            std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations"),
        ];
        let mut last_error: Option<sqlx::migrate::MigrateError> = None;

        for dir in &candidates {
            match sqlx::migrate::Migrator::new(dir.clone()).await {
                Ok(migrator) => {
                    info!(migrations_dir = %dir.display(), "Loaded migrations");
                    migrator.run(&self.pool).await.map_err(DbError::Migration)?;
                    info!("Database migrations complete");
                    return Ok(());
                }
                Err(e) => {
                    last_error = Some(e);
                }
            }
        }

        let tried = candidates
            .iter()
            .map(|dir| dir.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        Err(DbError::MigrationDirNotFound {
            tried,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string()),
        })
    }

    /// Get an event repository backed by this pool.
    pub fn event_repository(&self) -> PgEventRepository {
        PgEventRepository::new(self.pool.clone())
    }

    /// Close every connection in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
