//! Route resolution and lazy view loading.
//!
//! # Responsibilities
//! - Map a requested path to the entry that serves it (redirects followed)
//! - Fetch each view on first navigation and reuse it afterwards
//! - Share one fetch between concurrent resolutions of the same entry
//! - Decide which of several overlapping resolutions gets surfaced
//! - Track the last successfully resolved path
//!
//! # State Machine (per request)
//! ```text
//! Idle → Resolving → Resolved → Idle
//!                  ↘ Failed (terminal for that request)
//! ```
//!
//! # Design Decisions
//! - Cache key is entry identity, so aliases via redirect share one view
//! - Failed loads are never cached; the next resolve re-invokes the loader
//! - Loads run on their own task: a requester going away does not cancel
//!   the fetch, and the cache is still populated when it lands

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use crate::error::{LoadError, RoutingError};
use crate::observability::metrics;
use crate::routing::history::NavigationRequest;
use crate::routing::loader::View;
use crate::routing::table::{EntryId, RouteEntry, RouteTable};

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<View>, LoadError>>>;

/// How overlapping resolutions are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationPolicy {
    /// A resolution that finishes after a newer one started is discarded.
    #[default]
    LatestWins,
    /// Resolutions run one at a time in request order; every result is surfaced.
    Sequential,
}

/// Result of a successful resolution.
#[derive(Debug, Clone)]
pub struct ResolvedView {
    pub view: Arc<View>,
    pub entry: Arc<RouteEntry>,
    pub request: NavigationRequest,
}

/// Marks a resolution's place in the request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Exclusive slot in the resolution order. Only held under `Sequential`.
#[derive(Debug)]
pub struct Turn<'a> {
    _guard: Option<MutexGuard<'a, ()>>,
}

/// Resolves navigation requests against an immutable route table.
pub struct Resolver {
    table: Arc<RouteTable>,
    cache: Arc<DashMap<EntryId, Arc<View>>>,
    in_flight: Arc<DashMap<EntryId, SharedLoad>>,
    current: ArcSwapOption<String>,
    policy: NavigationPolicy,
    generation: AtomicU64,
    order: Mutex<()>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("routes", &self.table.len())
            .field("cached_views", &self.cache.len())
            .field("in_flight", &self.in_flight.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Resolver {
    /// Create a resolver with the default latest-wins policy.
    pub fn new(table: RouteTable) -> Self {
        Self::with_policy(table, NavigationPolicy::default())
    }

    pub fn with_policy(table: RouteTable, policy: NavigationPolicy) -> Self {
        Self {
            table: Arc::new(table),
            cache: Arc::new(DashMap::new()),
            in_flight: Arc::new(DashMap::new()),
            current: ArcSwapOption::empty(),
            policy,
            generation: AtomicU64::new(0),
            order: Mutex::new(()),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    /// Path of the entry last rendered, `None` before the first success.
    pub fn current_path(&self) -> Option<String> {
        self.current.load_full().map(|p| p.as_ref().clone())
    }

    /// True once the view serving `path` is in the cache.
    pub fn is_loaded(&self, path: &str) -> bool {
        self.table
            .follow(path)
            .map(|(id, _)| self.cache.contains_key(&id))
            .unwrap_or(false)
    }

    /// Number of views held in the cache.
    pub fn cached_views(&self) -> usize {
        self.cache.len()
    }

    /// Resolve a bare path.
    pub async fn resolve(&self, path: &str) -> Result<ResolvedView, RoutingError> {
        self.resolve_request(NavigationRequest::new(path)).await
    }

    /// Resolve a request as a new navigation.
    pub async fn resolve_request(&self, request: NavigationRequest) -> Result<ResolvedView, RoutingError> {
        let ticket = self.begin();
        self.resolve_ticketed(request, ticket).await
    }

    /// Claim a place in the request order. Retries of the same navigation reuse it.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while no newer navigation has begun.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Wait for this caller's turn. Under `Sequential` turns are granted in
    /// request order and every resolution made while holding one completes
    /// before the next caller runs.
    pub async fn turn(&self) -> Turn<'_> {
        let guard = match self.policy {
            NavigationPolicy::Sequential => Some(self.order.lock().await),
            NavigationPolicy::LatestWins => None,
        };
        Turn { _guard: guard }
    }

    /// Resolve `request` under an existing ticket.
    pub async fn resolve_ticketed(
        &self,
        request: NavigationRequest,
        ticket: Ticket,
    ) -> Result<ResolvedView, RoutingError> {
        let turn = self.turn().await;
        self.resolve_in_turn(request, ticket, &turn).await
    }

    /// Resolve `request` while the caller already holds its turn.
    pub async fn resolve_in_turn(
        &self,
        request: NavigationRequest,
        ticket: Ticket,
        _turn: &Turn<'_>,
    ) -> Result<ResolvedView, RoutingError> {
        tracing::debug!(
            navigation_id = %request.id(),
            path = %request.path(),
            "Resolving"
        );

        let outcome = self.resolve_entry(&request).await;

        if self.policy == NavigationPolicy::LatestWins && !self.is_current(ticket) {
            tracing::debug!(
                navigation_id = %request.id(),
                path = %request.path(),
                "Discarding stale resolution"
            );
            metrics::record_resolution("superseded");
            return Err(RoutingError::Superseded {
                path: request.path().to_string(),
            });
        }

        match outcome {
            Ok((view, entry)) => {
                self.current.store(Some(Arc::new(entry.path().to_string())));
                metrics::record_resolution("resolved");
                tracing::info!(
                    navigation_id = %request.id(),
                    path = %request.path(),
                    route = %entry.name(),
                    "Resolved"
                );
                Ok(ResolvedView { view, entry, request })
            }
            Err(e) => {
                metrics::record_resolution(e.kind());
                tracing::warn!(
                    navigation_id = %request.id(),
                    path = %request.path(),
                    error = %e,
                    "Resolution failed"
                );
                Err(e)
            }
        }
    }

    async fn resolve_entry(
        &self,
        request: &NavigationRequest,
    ) -> Result<(Arc<View>, Arc<RouteEntry>), RoutingError> {
        let (id, entry) = self.table.follow(request.path())?;
        let entry = Arc::clone(entry);

        let view = self.load(id, &entry).await.map_err(|e| RoutingError::LoadFailure {
            path: entry.path().to_string(),
            reason: e.to_string(),
        })?;

        Ok((view, entry))
    }

    async fn load(&self, id: EntryId, entry: &RouteEntry) -> Result<Arc<View>, LoadError> {
        if let Some(view) = self.cache.get(&id) {
            metrics::record_cache_hit();
            return Ok(Arc::clone(view.value()));
        }

        let pending = match self.in_flight.entry(id) {
            Entry::Occupied(slot) => {
                tracing::debug!(path = %entry.path(), "Joining in-flight view load");
                slot.get().clone()
            }
            Entry::Vacant(slot) => {
                // The load may have landed between the cache check and taking the slot.
                if let Some(view) = self.cache.get(&id) {
                    metrics::record_cache_hit();
                    return Ok(Arc::clone(view.value()));
                }
                let pending = self.spawn_load(id, entry)?;
                slot.insert(pending.clone());
                pending
            }
        };

        pending.await
    }

    fn spawn_load(&self, id: EntryId, entry: &RouteEntry) -> Result<SharedLoad, LoadError> {
        let loader = entry
            .loader()
            .ok_or_else(|| LoadError::new(format!("route '{}' has no loader", entry.path())))?;

        let fetch = loader.load();
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);
        let path = entry.path().to_string();

        tracing::debug!(path = %path, entry = %id, "Starting view load");

        let task = tokio::spawn(async move {
            let started = Instant::now();
            let result = fetch.await.map(Arc::new);
            match &result {
                Ok(view) => {
                    cache.insert(id, Arc::clone(view));
                    metrics::record_view_load("ok", started);
                    metrics::record_cache_size(cache.len());
                    tracing::info!(path = %path, component = %view.component(), "View loaded");
                }
                Err(e) => {
                    metrics::record_view_load("error", started);
                    tracing::warn!(path = %path, error = %e, "View load failed");
                }
            }
            in_flight.remove(&id);
            result
        });

        Ok(async move {
            task.await
                .unwrap_or_else(|e| Err(LoadError::new(format!("load task aborted: {}", e))))
        }
        .boxed()
        .shared())
    }
}
