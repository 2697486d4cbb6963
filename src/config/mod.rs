//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! routes.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors collected)
//!     → AppConfig (validated, immutable)
//!     → lifecycle::startup builds the RouteTable from it
//! ```
//!
//! # Design Decisions
//! - One canonical route table per process; no hot reload
//! - All sections have defaults so a file may contain only `[[routes]]`
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, HistoryConfig, NavigationConfig, ObservabilityConfig, RouteConfig, TransportConfig,
    ViewsConfig,
};
