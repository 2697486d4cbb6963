//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! resolver / navigator / loaders produce:
//!     → logging.rs (structured tracing events, navigation_id correlation)
//!     → metrics.rs (resolution outcomes, view loads, cache hits)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → Prometheus text snapshot (CLI --metrics)
//! ```
//!
//! # Design Decisions
//! - Every navigation carries a UUID so log lines can be correlated
//! - Metrics go through the `metrics` facade; without a recorder they are no-ops

pub mod logging;
pub mod metrics;
