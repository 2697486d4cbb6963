//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Unique paths and names, well-formed rows
//! - Referential integrity: redirects and the fallback name registered paths
//! - Redirect chains terminate at a view
//! - The root path forwards to a landing view
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: AppConfig → Result<(), Vec<ConfigurationError>>
//! - Runs before any route table is built

use std::collections::{HashMap, HashSet};

use crate::config::schema::{AppConfig, RouteConfig};
use crate::error::ConfigurationError;

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ConfigurationError>> {
    let mut errors = Vec::new();

    check_rows(&config.routes, &mut errors);
    check_redirects(&config.routes, &mut errors);

    if let Some(fallback) = &config.navigation.fallback_path {
        if !config.routes.iter().any(|r| &r.path == fallback) {
            errors.push(ConfigurationError::UnknownFallback(fallback.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_rows(routes: &[RouteConfig], errors: &mut Vec<ConfigurationError>) {
    let mut paths = HashSet::new();
    let mut names = HashSet::new();

    for route in routes {
        let malformed = |reason: &str| ConfigurationError::MalformedEntry {
            route: if route.path.is_empty() { route.name.clone() } else { route.path.clone() },
            reason: reason.to_string(),
        };

        if !route.path.starts_with('/') {
            errors.push(malformed("path must start with '/'"));
        }
        if route.name.is_empty() {
            errors.push(malformed("name must not be empty"));
        }
        match (&route.redirect, &route.component) {
            (Some(_), Some(_)) => errors.push(malformed("set either redirect or component, not both")),
            (None, None) => errors.push(malformed("needs a redirect or a component")),
            (Some(to), None) if !to.starts_with('/') => {
                errors.push(malformed("redirect must name an absolute path"))
            }
            (None, Some(component)) if component.is_empty() => {
                errors.push(malformed("component must not be empty"))
            }
            _ => {}
        }

        if !paths.insert(route.path.as_str()) {
            errors.push(ConfigurationError::DuplicatePath(route.path.clone()));
        }
        if !names.insert(route.name.as_str()) {
            errors.push(ConfigurationError::DuplicateName(route.name.clone()));
        }

        if route.path == "/" && route.redirect.is_none() {
            errors.push(ConfigurationError::RootWithoutRedirect);
        }
    }
}

fn check_redirects(routes: &[RouteConfig], errors: &mut Vec<ConfigurationError>) {
    // First registration wins, matching runtime lookup.
    let mut targets: HashMap<&str, Option<&str>> = HashMap::new();
    for route in routes {
        targets
            .entry(route.path.as_str())
            .or_insert(route.redirect.as_deref());
    }

    let mut reported_cycles = HashSet::new();

    for route in routes {
        let Some(first) = route.redirect.as_deref() else {
            continue;
        };

        let mut trail = vec![route.path.as_str()];
        let mut current = first;

        loop {
            match targets.get(current).copied() {
                None => {
                    let dangling = ConfigurationError::DanglingRedirect {
                        from: trail.last().copied().unwrap_or_default().to_string(),
                        to: current.to_string(),
                    };
                    if !errors.contains(&dangling) {
                        errors.push(dangling);
                    }
                    break;
                }
                Some(None) => break,
                Some(Some(next)) => {
                    if let Some(pos) = trail.iter().position(|p| *p == current) {
                        // report each cycle once, keyed by its smallest member
                        let key = trail[pos..].iter().min().copied().unwrap_or(current);
                        if reported_cycles.insert(key) {
                            errors.push(ConfigurationError::RedirectCycle(key.to_string()));
                        }
                        break;
                    }
                    trail.push(current);
                    current = next;
                }
            }
        }
    }
}
