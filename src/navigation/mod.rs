//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! navigate(location) / navigate_named(name) / back() / forward()
//!     → state.rs (publish Resolving)
//!     → routing::Resolver (resolve under one ticket)
//!         → LoadFailure? resilience::backoff, retry while still current
//!         → NotFound / RedirectCycle? resolve fallback_path if configured
//!     → history stack updated on success
//!     → state.rs (publish Resolved or Failed)
//! ```
//!
//! # Design Decisions
//! - A failed navigation is always published; the UI never keeps a stale view silently
//! - Superseded navigations publish nothing; the newer one owns the state
//! - The rendering layer acknowledges with `rendered()`, returning the machine to Idle

pub mod navigator;
pub mod state;

pub use navigator::{NavigationOutcome, Navigator};
pub use state::NavigationState;
