//! Resilience helpers.
//!
//! # Data Flow
//! ```text
//! Navigator sees LoadFailure:
//!     → backoff.rs (delay before re-invoking the loader)
//!     → retry while attempts remain and the navigation is still current
//! ```

pub mod backoff;
