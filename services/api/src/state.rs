//! Application state shared across request handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::db::{Database, EventRepository};

/// Shared application state.
///
/// This is passed to all request handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    repository: Arc<dyn EventRepository>,
    db: Option<Database>,
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state backed by a Postgres database.
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                repository: Arc::new(db.event_repository()),
                db: Some(db),
                metrics: None,
            }),
        }
    }

    /// Create state around an arbitrary repository, with no database to probe.
    pub fn with_repository(repository: Arc<dyn EventRepository>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                repository,
                db: None,
                metrics: None,
            }),
        }
    }

    /// Attach a Prometheus handle used to render `/metrics`.
    pub fn with_metrics(self, handle: PrometheusHandle) -> Self {
        let inner = AppStateInner {
            repository: Arc::clone(&self.inner.repository),
            db: self.inner.db.clone(),
            metrics: Some(handle),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Get the event repository.
    pub fn repository(&self) -> &dyn EventRepository {
        self.inner.repository.as_ref()
    }

    /// Get the database, if the state is backed by one.
    pub fn db(&self) -> Option<&Database> {
        self.inner.db.as_ref()
    }

    /// Get the Prometheus handle, if one is attached.
    pub fn metrics(&self) -> Option<&PrometheusHandle> {
        self.inner.metrics.as_ref()
    }
}
