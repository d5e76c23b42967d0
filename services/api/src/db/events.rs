//! Postgres-backed event repository.
//!
//! Saves run inside a transaction using `INSERT ... RETURNING`, so the
//! store-generated `id` and `created_at` come back in the same round trip.
//! Reads are a single primary-key lookup.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use evtbook_events::{Event, NewEvent};
use sqlx::{postgres::PgPool, postgres::PgRow, Row};
use tracing::instrument;
use uuid::Uuid;

use super::{DbMetrics, EventRepository, RepositoryError};

const SAVE_EVENT: &str = "save_event";
const GET_EVENT_BY_ID: &str = "get_event_by_id";

/// A row from the events table.
#[derive(Debug, Clone)]
struct EventRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for EventRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id.to_string(),
            title: row.title,
            description: row.description,
            start_time: row.start_time,
            end_time: row.end_time,
            created_at: row.created_at,
        }
    }
}

/// Event repository over a Postgres pool.
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
    metrics: DbMetrics,
}

impl PgEventRepository {
    /// Create a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            metrics: DbMetrics::new("postgres"),
        }
    }

    async fn insert(&self, event: &NewEvent) -> Result<Event, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::TransactionBegin)?;

        let inserted = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (title, description, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, start_time, end_time, created_at
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_time)
        .bind(event.end_time)
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            Err(e) => {
                // The insert error is the one worth reporting.
                let _ = tx.rollback().await;
                return Err(RepositoryError::Insert(e));
            }
        };

        tx.commit().await.map_err(RepositoryError::Commit)?;

        Ok(row.into())
    }

    async fn select(&self, id: &str) -> Result<Event, RepositoryError> {
        // Ids are UUIDs; anything else cannot match a row.
        let Ok(id) = Uuid::parse_str(id) else {
            return Err(RepositoryError::EventNotFound);
        };

        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, start_time, end_time, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => RepositoryError::EventNotFound,
            e => RepositoryError::Query(e),
        })?;

        Ok(row.into())
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    #[instrument(name = "repository.save_event", skip_all, fields(db.system = "postgres"))]
    async fn save_event(&self, event: &NewEvent) -> Result<Event, RepositoryError> {
        let start = Instant::now();
        let result = self.insert(event).await;
        self.metrics.observe(SAVE_EVENT, start, result.is_err());
        result
    }

    #[instrument(
        name = "repository.get_event_by_id",
        skip(self),
        fields(db.system = "postgres")
    )]
    async fn get_event_by_id(&self, id: &str) -> Result<Event, RepositoryError> {
        let start = Instant::now();
        let result = self.select(id).await;
        self.metrics.observe(GET_EVENT_BY_ID, start, result.is_err());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn closed_repository() -> PgEventRepository {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/evtbook")
            .unwrap();
        pool.close().await;
        PgEventRepository::new(pool)
    }

    fn new_event() -> NewEvent {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        NewEvent {
            title: "Team sync".to_string(),
            description: None,
            start_time: at,
            end_time: at,
        }
    }

    #[tokio::test]
    async fn test_save_without_connection_fails_to_begin() {
        let repository = closed_repository().await;

        let err = repository.save_event(&new_event()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::TransactionBegin(_)));
        assert!(err.to_string().starts_with("failed to begin transaction"));
    }

    #[tokio::test]
    async fn test_get_without_connection_is_query_error() {
        let repository = closed_repository().await;

        let err = repository
            .get_event_by_id(&Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_non_uuid_is_not_found_without_query() {
        let repository = closed_repository().await;

        let err = repository.get_event_by_id("does-not-exist").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_row_into_event() {
        let id = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        let row = EventRow {
            id,
            title: "Team sync".to_string(),
            description: None,
            start_time: at,
            end_time: at,
            created_at: at,
        };

        let event: Event = row.into();
        assert_eq!(event.id, id.to_string());
        assert_eq!(event.title, "Team sync");
        assert_eq!(event.created_at, at);
    }
}
