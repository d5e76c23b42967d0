//! Per-operation query metrics.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};

/// Total queries issued, by operation.
pub const DB_QUERY_TOTAL: &str = "db_query_total";
/// Failed queries, by operation.
pub const DB_QUERY_ERRORS_TOTAL: &str = "db_query_errors_total";
/// Query latency in seconds, by operation.
pub const DB_QUERY_DURATION_SECONDS: &str = "db_query_duration_seconds";

/// Records call count, error count and latency for repository operations.
///
/// Every sample is labelled with the store system and the operation name.
#[derive(Debug, Clone)]
pub struct DbMetrics {
    system: &'static str,
}

impl DbMetrics {
    /// Create a recorder for the given store system (e.g. `postgres`).
    pub fn new(system: &'static str) -> Self {
        Self { system }
    }

    /// Register metric descriptions with the installed recorder.
    pub fn describe() {
        describe_counter!(DB_QUERY_TOTAL, "Total number of database queries");
        describe_counter!(
            DB_QUERY_ERRORS_TOTAL,
            "Total number of failed database queries"
        );
        describe_histogram!(
            DB_QUERY_DURATION_SECONDS,
            metrics::Unit::Seconds,
            "Database query latency"
        );
    }

    /// Record one completed operation that started at `start`.
    pub fn observe(&self, operation: &'static str, start: Instant, failed: bool) {
        let labels = [("db_system", self.system), ("db_operation", operation)];

        counter!(DB_QUERY_TOTAL, &labels).increment(1);
        histogram!(DB_QUERY_DURATION_SECONDS, &labels).record(start.elapsed().as_secs_f64());

        if failed {
            counter!(DB_QUERY_ERRORS_TOTAL, &labels).increment(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_without_recorder_is_noop() {
        let metrics = DbMetrics::new("postgres");
        metrics.observe("save_event", Instant::now(), false);
        metrics.observe("get_event_by_id", Instant::now(), true);
    }
}
