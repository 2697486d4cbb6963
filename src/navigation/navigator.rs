//! Navigation driver sitting between the UI layer and the resolver.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::config::NavigationConfig;
use crate::error::RoutingError;
use crate::navigation::state::NavigationState;
use crate::resilience::backoff::Backoff;
use crate::routing::{HashHistory, NavigationPolicy, NavigationRequest, ResolvedView, Resolver, Ticket, Turn};

/// What a single navigation produced.
#[derive(Debug, Clone)]
pub enum NavigationOutcome {
    /// The requested view is ready.
    Rendered(ResolvedView),
    /// The request failed and the configured fallback view was rendered instead.
    Fallback {
        error: RoutingError,
        resolved: ResolvedView,
    },
    /// A newer navigation started before this one finished.
    Superseded,
    /// Nothing was rendered.
    Failed(RoutingError),
}

impl NavigationOutcome {
    /// The view to render, if any.
    pub fn resolved(&self) -> Option<&ResolvedView> {
        match self {
            NavigationOutcome::Rendered(resolved) | NavigationOutcome::Fallback { resolved, .. } => {
                Some(resolved)
            }
            NavigationOutcome::Superseded | NavigationOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RoutingError> {
        match self {
            NavigationOutcome::Fallback { error, .. } | NavigationOutcome::Failed(error) => Some(error),
            NavigationOutcome::Rendered(_) | NavigationOutcome::Superseded => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum HistoryMove {
    Push,
    Back,
    Forward,
}

/// Drives navigations: state publication, retries, fallback and history.
#[derive(Debug)]
pub struct Navigator {
    resolver: Arc<Resolver>,
    config: NavigationConfig,
    backoff: Backoff,
    history: Mutex<HashHistory>,
    state: watch::Sender<NavigationState>,
}

impl Navigator {
    pub fn new(resolver: Arc<Resolver>, config: NavigationConfig, history: HashHistory) -> Self {
        let (state, _) = watch::channel(NavigationState::Idle);
        let backoff = Backoff::new(config.retry_base_delay_ms, config.retry_max_delay_ms);
        Self {
            resolver,
            config,
            backoff,
            history: Mutex::new(history),
            state,
        }
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    /// Watch navigation state changes.
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.state.subscribe()
    }

    /// Snapshot of the current navigation state.
    pub fn state(&self) -> NavigationState {
        self.state.borrow().clone()
    }

    pub fn current_path(&self) -> Option<String> {
        self.resolver.current_path()
    }

    /// Address of `path` in hash mode.
    pub fn href(&self, path: &str) -> String {
        self.history().href(path)
    }

    pub fn can_go_back(&self) -> bool {
        self.history().peek_back().is_some()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history().peek_forward().is_some()
    }

    /// Navigate to a location, hash, or bare path.
    pub async fn navigate(&self, location: &str) -> NavigationOutcome {
        self.dispatch(NavigationRequest::parse(location), HistoryMove::Push).await
    }

    /// Navigate to the entry registered under `name`.
    pub async fn navigate_named(&self, name: &str) -> NavigationOutcome {
        let path = match self.resolver.table().by_name(name) {
            Some((_, entry)) => entry.path().to_string(),
            None => {
                // Still a navigation: it supersedes older ones and waits its turn.
                let _ticket = self.resolver.begin();
                let _turn = self.resolver.turn().await;
                tracing::warn!(name = %name, "No route registered under name");
                return self.fail(
                    name.to_string(),
                    RoutingError::NotFound {
                        path: name.to_string(),
                    },
                );
            }
        };
        self.dispatch(NavigationRequest::new(path), HistoryMove::Push).await
    }

    /// Re-resolve the previous history entry. `None` at the start of history.
    pub async fn back(&self) -> Option<NavigationOutcome> {
        let path = self.history().peek_back()?.to_string();
        Some(self.dispatch(NavigationRequest::new(path), HistoryMove::Back).await)
    }

    /// Re-resolve the next history entry. `None` at the end of history.
    pub async fn forward(&self) -> Option<NavigationOutcome> {
        let path = self.history().peek_forward()?.to_string();
        Some(self.dispatch(NavigationRequest::new(path), HistoryMove::Forward).await)
    }

    /// The rendering layer has consumed the resolved view.
    pub fn rendered(&self) {
        self.state.send_if_modified(|state| {
            if matches!(state, NavigationState::Resolved { .. }) {
                *state = NavigationState::Idle;
                true
            } else {
                false
            }
        });
    }

    async fn dispatch(&self, request: NavigationRequest, movement: HistoryMove) -> NavigationOutcome {
        let ticket = self.resolver.begin();
        let path = request.path().to_string();

        self.state.send_replace(NavigationState::Resolving { path: path.clone() });

        // Retries and the fallback run inside one turn, so under `Sequential`
        // no newer navigation lands between attempts.
        let turn = self.resolver.turn().await;

        match self.resolve_with_retry(request, ticket, &turn).await {
            Ok(resolved) => {
                if self.is_stale(ticket) {
                    return NavigationOutcome::Superseded;
                }
                self.commit(&resolved, movement);
                NavigationOutcome::Rendered(resolved)
            }
            Err(RoutingError::Superseded { .. }) => NavigationOutcome::Superseded,
            Err(error) if error.wants_fallback() => self.fall_back(path, error, ticket, &turn).await,
            Err(error) => self.fail(path, error),
        }
    }

    async fn resolve_with_retry(
        &self,
        request: NavigationRequest,
        ticket: Ticket,
        turn: &Turn<'_>,
    ) -> Result<ResolvedView, RoutingError> {
        let mut attempt = 0;
        loop {
            match self.resolver.resolve_in_turn(request.clone(), ticket, turn).await {
                Err(e @ RoutingError::LoadFailure { .. }) if attempt < self.config.load_retries => {
                    attempt += 1;
                    let delay = self.backoff.delay(attempt);
                    tracing::info!(
                        navigation_id = %request.id(),
                        path = %request.path(),
                        attempt,
                        delay = ?delay,
                        error = %e,
                        "Retrying view load"
                    );
                    tokio::time::sleep(delay).await;
                    if self.is_stale(ticket) {
                        return Err(RoutingError::Superseded {
                            path: request.path().to_string(),
                        });
                    }
                }
                other => return other,
            }
        }
    }

    async fn fall_back(
        &self,
        path: String,
        error: RoutingError,
        ticket: Ticket,
        turn: &Turn<'_>,
    ) -> NavigationOutcome {
        let fallback = match &self.config.fallback_path {
            Some(fallback) if *fallback != path => fallback.clone(),
            _ => return self.fail(path, error),
        };

        tracing::warn!(path = %path, error = %error, fallback = %fallback, "Rendering fallback view");

        match self
            .resolver
            .resolve_in_turn(NavigationRequest::new(fallback), ticket, turn)
            .await
        {
            Ok(resolved) => {
                if self.is_stale(ticket) {
                    return NavigationOutcome::Superseded;
                }
                self.commit(&resolved, HistoryMove::Push);
                NavigationOutcome::Fallback { error, resolved }
            }
            Err(RoutingError::Superseded { .. }) => NavigationOutcome::Superseded,
            Err(fallback_error) => {
                tracing::error!(error = %fallback_error, "Fallback view failed");
                self.fail(path, error)
            }
        }
    }

    fn fail(&self, path: String, error: RoutingError) -> NavigationOutcome {
        self.state.send_replace(NavigationState::Failed {
            path,
            error: error.clone(),
        });
        NavigationOutcome::Failed(error)
    }

    fn commit(&self, resolved: &ResolvedView, movement: HistoryMove) {
        let path = resolved.entry.path().to_string();
        {
            let mut history = self.history();
            match movement {
                HistoryMove::Push => history.push(path.clone()),
                HistoryMove::Back => {
                    history.back();
                }
                HistoryMove::Forward => {
                    history.forward();
                }
            }
        }
        self.state.send_replace(NavigationState::Resolved {
            path,
            view: Arc::clone(&resolved.view),
        });
    }

    fn is_stale(&self, ticket: Ticket) -> bool {
        self.resolver.policy() == NavigationPolicy::LatestWins && !self.resolver.is_current(ticket)
    }

    fn history(&self) -> MutexGuard<'_, HashHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
