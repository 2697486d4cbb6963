//! Per-navigation state machine.
//!
//! # States
//! - Idle: nothing in progress, last view handed to the renderer
//! - Resolving: a request is being resolved (possibly suspended on a loader)
//! - Resolved: a view is ready for the renderer
//! - Failed: the request failed; terminal until a new navigation starts
//!
//! # State Transitions
//! ```text
//! Idle → Resolving: navigate()
//! Resolving → Resolved: resolution succeeded
//! Resolving → Failed: resolution failed (no fallback, or fallback failed)
//! Resolved → Idle: rendered()
//! Resolved / Failed → Resolving: next navigate()
//! ```

use std::sync::Arc;

use crate::error::RoutingError;
use crate::routing::View;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavigationState {
    #[default]
    Idle,
    Resolving {
        path: String,
    },
    Resolved {
        path: String,
        view: Arc<View>,
    },
    Failed {
        path: String,
        error: RoutingError,
    },
}

impl NavigationState {
    /// Path the state refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            NavigationState::Idle => None,
            NavigationState::Resolving { path }
            | NavigationState::Resolved { path, .. }
            | NavigationState::Failed { path, .. } => Some(path),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, NavigationState::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavigationState::Idle => "idle",
            NavigationState::Resolving { .. } => "resolving",
            NavigationState::Resolved { .. } => "resolved",
            NavigationState::Failed { .. } => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_accessors() {
        assert_eq!(NavigationState::default(), NavigationState::Idle);
        assert_eq!(NavigationState::Idle.path(), None);

        let failed = NavigationState::Failed {
            path: "/missing".into(),
            error: RoutingError::NotFound { path: "/missing".into() },
        };
        assert!(failed.is_failed());
        assert_eq!(failed.path(), Some("/missing"));
        assert_eq!(failed.label(), "failed");
    }
}
