//! Logging and metrics setup for the binary.
//!
//! Both are installed once at startup; handlers and the repository only use
//! the `tracing` and `metrics` facades.

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{api, db::DbMetrics};

/// Initialize JSON logging (prefer RUST_LOG, fallback to `log_level`).
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Install the Prometheus recorder.
///
/// Returns `None` if a recorder could not be installed; the service keeps
/// running without `/metrics` in that case.
pub fn install_metrics() -> Option<PrometheusHandle> {
    let builder = match PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Suffix("duration_seconds".to_string()),
        &[
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ],
    ) {
        Ok(builder) => builder,
        Err(e) => {
            warn!(error = %e, "Failed to configure metrics exporter");
            return None;
        }
    };

    match builder.install_recorder() {
        Ok(handle) => {
            DbMetrics::describe();
            api::metrics::describe();
            info!("Metrics recorder installed");
            Some(handle)
        }
        Err(e) => {
            warn!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}
