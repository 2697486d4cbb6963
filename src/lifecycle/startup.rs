//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Turn route rows into a `RouteTable` using the view catalog
//! - Construct the resolver and navigator
//! - Install capabilities into the application root
//! - Mount: perform the initial navigation
//!
//! # Design Decisions
//! - Fail fast: any configuration error is fatal
//! - Building the table never fetches a view; only navigation does

use std::any::Any;
use std::sync::Arc;

use crate::capabilities::{Capabilities, Transport, WsTransport};
use crate::config::{validation::validate_config, AppConfig, ConfigError, RouteConfig};
use crate::error::ConfigurationError;
use crate::navigation::{NavigationOutcome, Navigator};
use crate::routing::{HashHistory, Resolver, RouteEntry, RouteTable, ViewCatalog};

/// The application root: owns the navigator and the installed capabilities.
#[derive(Debug)]
pub struct Application {
    config: AppConfig,
    navigator: Arc<Navigator>,
    capabilities: Capabilities,
}

impl Application {
    /// Build the application root from a configuration and a view catalog.
    pub fn bootstrap(config: AppConfig, catalog: &ViewCatalog) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let table = build_table(&config.routes, catalog)?;
        let resolver = Arc::new(Resolver::with_policy(table, config.navigation.policy));
        let navigator = Arc::new(Navigator::new(
            resolver,
            config.navigation.clone(),
            HashHistory::new(config.history.base.clone()),
        ));

        let mut capabilities = Capabilities::new();
        if config.transport.enabled {
            let transport: Arc<dyn Transport> = Arc::new(WsTransport::new(config.transport.url.clone()));
            capabilities.install(transport);
            tracing::info!(url = %config.transport.url, "Transport capability installed");
        }

        tracing::info!(
            routes = config.routes.len(),
            policy = ?config.navigation.policy,
            "Application bootstrapped"
        );

        Ok(Self {
            config,
            navigator,
            capabilities,
        })
    }

    /// Install a capability (state store, cipher, ...) into the root.
    pub fn install<T: Any + Send + Sync>(&mut self, capability: T) -> Option<T> {
        self.capabilities.install(capability)
    }

    pub fn capability<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.capabilities.get::<T>()
    }

    /// The real-time transport, if enabled.
    pub fn transport(&self) -> Option<Arc<dyn Transport>> {
        self.capabilities.get::<Arc<dyn Transport>>().cloned()
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        self.navigator.resolver()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Navigate to the configured initial location.
    pub async fn mount(&self) -> NavigationOutcome {
        tracing::info!(initial = %self.config.history.initial, "Mounting application");
        self.navigator.navigate(&self.config.history.initial).await
    }
}

/// Map route rows onto table entries, resolving component keys through the catalog.
fn build_table(routes: &[RouteConfig], catalog: &ViewCatalog) -> Result<RouteTable, ConfigError> {
    let mut entries = Vec::with_capacity(routes.len());
    let mut unknown = Vec::new();

    for route in routes {
        match (&route.redirect, &route.component) {
            (Some(to), _) => entries.push(RouteEntry::redirect(&route.path, &route.name, to)),
            (None, Some(component)) => match catalog.loader_for(component) {
                Some(loader) => entries.push(RouteEntry::lazy(&route.path, &route.name, loader)),
                None => unknown.push(ConfigurationError::UnknownComponent {
                    path: route.path.clone(),
                    component: component.clone(),
                }),
            },
            (None, None) => unknown.push(ConfigurationError::MalformedEntry {
                route: route.path.clone(),
                reason: "needs a redirect or a component".to_string(),
            }),
        }
    }

    if !unknown.is_empty() {
        return Err(ConfigError::Validation(unknown));
    }

    Ok(RouteTable::new(entries)?)
}
