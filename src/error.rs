//! Error taxonomy for route registration and resolution.
//!
//! # Propagation
//! - `ConfigurationError` is fatal and surfaces before any navigation
//! - `NotFound` and `RedirectCycle` are recoverable; the UI renders a fallback
//! - `LoadFailure` is recoverable per attempt and never cached
//! - `Superseded` means a newer navigation owns the outcome

use thiserror::Error;

/// Route table or configuration rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("duplicate route path '{0}'")]
    DuplicatePath(String),

    #[error("duplicate route name '{0}'")]
    DuplicateName(String),

    #[error("malformed route '{route}': {reason}")]
    MalformedEntry { route: String, reason: String },

    #[error("route '{from}' redirects to unknown path '{to}'")]
    DanglingRedirect { from: String, to: String },

    #[error("redirect cycle starting at '{0}'")]
    RedirectCycle(String),

    #[error("root path '/' must redirect to a landing view")]
    RootWithoutRedirect,

    #[error("fallback path '{0}' is not a registered route")]
    UnknownFallback(String),

    #[error("route '{path}' references unknown component '{component}'")]
    UnknownComponent { path: String, component: String },
}

/// Failure surfaced by a single `resolve` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("no route matches '{path}'")]
    NotFound { path: String },

    #[error("redirect chain from '{path}' exceeded {hops} hops")]
    RedirectCycle { path: String, hops: usize },

    #[error("failed to load view for '{path}': {reason}")]
    LoadFailure { path: String, reason: String },

    #[error("navigation to '{path}' was superseded by a newer request")]
    Superseded { path: String },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl RoutingError {
    /// True for lookup failures the UI answers with a fallback view.
    pub fn wants_fallback(&self) -> bool {
        matches!(
            self,
            RoutingError::NotFound { .. } | RoutingError::RedirectCycle { .. }
        )
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingError::NotFound { .. } => "not_found",
            RoutingError::RedirectCycle { .. } => "redirect_cycle",
            RoutingError::LoadFailure { .. } => "load_failure",
            RoutingError::Superseded { .. } => "superseded",
            RoutingError::Configuration(_) => "configuration",
        }
    }
}

/// Error produced by a view loader's deferred fetch.
///
/// Cloneable so one failed fetch can be reported to every caller that joined it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct LoadError(String);

impl LoadError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self(e.to_string())
    }
}
