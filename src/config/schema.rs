//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! application shell. All types derive Serde traits for deserialization
//! from `routes.toml`.

use serde::{Deserialize, Serialize};

use crate::routing::NavigationPolicy;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Hash-mode addressing.
    pub history: HistoryConfig,

    /// Navigation policy, retries, fallback.
    pub navigation: NavigationConfig,

    /// Where view sources are fetched from.
    pub views: ViewsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Real-time transport capability.
    pub transport: TransportConfig,

    /// Route table, in registration order.
    pub routes: Vec<RouteConfig>,
}

/// Hash history configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Prefix rendered before `#` in hrefs (e.g. "/index.html").
    pub base: String,

    /// Location navigated to when the application mounts.
    pub initial: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            base: String::new(),
            initial: "/".to_string(),
        }
    }
}

/// Navigation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// How overlapping resolutions are surfaced.
    pub policy: NavigationPolicy,

    /// Extra attempts after a view load fails.
    pub load_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub retry_base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub retry_max_delay_ms: u64,

    /// Path rendered when a navigation hits NotFound or a redirect cycle.
    pub fallback_path: Option<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            policy: NavigationPolicy::LatestWins,
            load_retries: 0,
            retry_base_delay_ms: 100,
            retry_max_delay_ms: 2000,
            fallback_path: None,
        }
    }
}

/// View source location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewsConfig {
    /// Directory holding one file per component key.
    pub directory: String,

    /// File extension of view sources.
    pub extension: String,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            directory: "views".to_string(),
            extension: "vue".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record resolver metrics.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
        }
    }
}

/// Real-time transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Install the WebSocket transport into the application root.
    pub enabled: bool,

    /// WebSocket endpoint.
    pub url: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "ws://127.0.0.1:9001".to_string(),
        }
    }
}

/// One route row as written in configuration.
///
/// Exactly one of `redirect` and `component` must be set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// URL path, unique across the table.
    pub path: String,

    /// Identifier for programmatic navigation, unique across the table.
    pub name: String,

    /// Path this route forwards to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,

    /// Component key resolved to a view loader at bootstrap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl RouteConfig {
    pub fn redirect(path: impl Into<String>, name: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            redirect: Some(to.into()),
            component: None,
        }
    }

    pub fn lazy(path: impl Into<String>, name: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            redirect: None,
            component: Some(component.into()),
        }
    }
}
