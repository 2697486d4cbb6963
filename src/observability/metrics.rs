//! Resolver metrics.
//!
//! # Metrics
//! - `resolver_resolutions_total` (counter): resolutions by outcome
//! - `resolver_view_loads_total` (counter): loader invocations by outcome
//! - `resolver_load_duration_seconds` (histogram): time spent in loaders
//! - `resolver_cache_hits_total` (counter): resolutions served from cache
//! - `resolver_cached_views` (gauge): views held in the cache

use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install a process-wide Prometheus recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

pub fn record_resolution(outcome: &'static str) {
    counter!("resolver_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_view_load(outcome: &'static str, started: Instant) {
    counter!("resolver_view_loads_total", "outcome" => outcome).increment(1);
    histogram!("resolver_load_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_cache_hit() {
    counter!("resolver_cache_hits_total").increment(1);
}

pub fn record_cache_size(views: usize) {
    gauge!("resolver_cached_views").set(views as f64);
}
