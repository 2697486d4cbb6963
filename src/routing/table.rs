//! Route table: ordered path → view bindings.
//!
//! # Responsibilities
//! - Register entries once, rejecting duplicates and malformed rows
//! - Exact, first-match lookup by path and by name
//! - Follow redirect chains with a bounded number of hops
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Entry identity is the entry's position, not its path string
//! - Hop bound equals the table size, so accidental cycles terminate

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigurationError, RoutingError};
use crate::routing::loader::ViewLoader;

/// Stable identity of an entry within its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

impl EntryId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry-{}", self.0)
    }
}

/// What an entry does when matched.
#[derive(Clone)]
pub enum RouteTarget {
    /// Forward to another registered path.
    Redirect(String),
    /// Lazily produce the view.
    Loader(Arc<dyn ViewLoader>),
}

impl fmt::Debug for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTarget::Redirect(to) => f.debug_tuple("Redirect").field(to).finish(),
            RouteTarget::Loader(loader) => f.debug_tuple("Loader").field(loader).finish(),
        }
    }
}

/// One row of the route table.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    path: String,
    name: String,
    target: RouteTarget,
}

impl RouteEntry {
    /// Entry that forwards to `to`.
    pub fn redirect(path: impl Into<String>, name: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            target: RouteTarget::Redirect(to.into()),
        }
    }

    /// Entry whose view is fetched on first navigation.
    pub fn lazy(path: impl Into<String>, name: impl Into<String>, loader: Arc<dyn ViewLoader>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            target: RouteTarget::Loader(loader),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &RouteTarget {
        &self.target
    }

    pub fn redirect_path(&self) -> Option<&str> {
        match &self.target {
            RouteTarget::Redirect(to) => Some(to),
            RouteTarget::Loader(_) => None,
        }
    }

    pub fn loader(&self) -> Option<&Arc<dyn ViewLoader>> {
        match &self.target {
            RouteTarget::Loader(loader) => Some(loader),
            RouteTarget::Redirect(_) => None,
        }
    }

    fn check_shape(&self) -> Result<(), ConfigurationError> {
        let malformed = |reason: &str| ConfigurationError::MalformedEntry {
            route: if self.path.is_empty() { self.name.clone() } else { self.path.clone() },
            reason: reason.to_string(),
        };

        if !self.path.starts_with('/') {
            return Err(malformed("path must start with '/'"));
        }
        if self.name.is_empty() {
            return Err(malformed("name must not be empty"));
        }
        if let RouteTarget::Redirect(to) = &self.target {
            if !to.starts_with('/') {
                return Err(malformed("redirect must name an absolute path"));
            }
        }
        Ok(())
    }
}

/// Ordered, immutable sequence of route entries.
#[derive(Debug)]
pub struct RouteTable {
    entries: Vec<Arc<RouteEntry>>,
}

impl RouteTable {
    /// Register the entries, failing fast on the first configuration error.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, ConfigurationError> {
        let mut paths = HashSet::new();
        let mut names = HashSet::new();

        for entry in &entries {
            entry.check_shape()?;
            if !paths.insert(entry.path.as_str()) {
                return Err(ConfigurationError::DuplicatePath(entry.path.clone()));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(ConfigurationError::DuplicateName(entry.name.clone()));
            }
        }

        tracing::debug!(routes = entries.len(), "Route table registered");

        Ok(Self {
            entries: entries.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&Arc<RouteEntry>> {
        self.entries.get(id.0)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &Arc<RouteEntry>)> {
        self.entries.iter().enumerate().map(|(i, e)| (EntryId(i), e))
    }

    /// Exact path match, first registered entry wins.
    pub fn lookup(&self, path: &str) -> Option<(EntryId, &Arc<RouteEntry>)> {
        self.iter().find(|(_, e)| e.path == path)
    }

    /// Entry registered under `name`.
    pub fn by_name(&self, name: &str) -> Option<(EntryId, &Arc<RouteEntry>)> {
        self.iter().find(|(_, e)| e.name == name)
    }

    /// Follow redirects from `path` to the loader-backed entry that serves it.
    pub fn follow(&self, path: &str) -> Result<(EntryId, &Arc<RouteEntry>), RoutingError> {
        let mut current = path;
        let mut hops = 0;

        loop {
            let (id, entry) = self.lookup(current).ok_or_else(|| RoutingError::NotFound {
                path: current.to_string(),
            })?;

            match &entry.target {
                RouteTarget::Loader(_) => return Ok((id, entry)),
                RouteTarget::Redirect(to) => {
                    if hops == self.entries.len() {
                        return Err(RoutingError::RedirectCycle {
                            path: path.to_string(),
                            hops,
                        });
                    }
                    tracing::trace!(from = %current, to = %to, "Following redirect");
                    hops += 1;
                    current = to;
                }
            }
        }
    }
}
