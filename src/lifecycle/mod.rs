//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Build route table from view catalog → Resolver
//!     → Navigator → Install capabilities → Mount (initial navigation)
//!
//! Shutdown (shutdown.rs):
//!     Signal received → navigation loop stops taking requests → Exit
//!     (in-flight view loads finish on their own tasks)
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl+C) → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any configuration error aborts startup before navigation
//! - Teardown never cancels view loads; the cache stays consistent

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::Application;
