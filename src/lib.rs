//! Hash-routed view resolver for single-page application shells.
//!
//! Maps URL paths (hash mode, `#/path`) to lazily loaded views: an ordered,
//! immutable route table, redirect following with a bounded hop count, a
//! per-entry view cache with in-flight dedupe, and a navigator that decides
//! which of several overlapping navigations gets rendered.

pub mod capabilities;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::AppConfig;
pub use error::{ConfigurationError, LoadError, RoutingError};
pub use lifecycle::{Application, Shutdown};
pub use navigation::{NavigationOutcome, NavigationState, Navigator};
pub use routing::{ResolvedView, Resolver, RouteEntry, RouteTable, View};
