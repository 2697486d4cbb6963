//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation (location, hash, or path)
//!     → history.rs (derive NavigationRequest from `#/path?query`)
//!     → resolver.rs (resolve request)
//!         → table.rs (exact lookup, follow redirects, bounded hops)
//!         → view cache hit? return cached view
//!         → in-flight load for the entry? join it
//!         → loader.rs (spawn deferred fetch, populate cache)
//!     → Return: ResolvedView or RoutingError
//!
//! Route Registration (at startup):
//!     RouteEntry[]
//!     → Reject duplicate paths / names, malformed rows
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Table built once, immutable at runtime
//! - Exact matching only; no parameterized segments
//! - Deterministic: first registered entry wins
//! - Views are fetched on first navigation and never twice

pub mod history;
pub mod loader;
pub mod resolver;
pub mod table;

pub use history::{HashHistory, NavigationRequest};
pub use loader::{loader_fn, FileLoader, View, ViewCatalog, ViewLoader};
pub use resolver::{NavigationPolicy, ResolvedView, Resolver, Ticket, Turn};
pub use table::{EntryId, RouteEntry, RouteTable, RouteTarget};
